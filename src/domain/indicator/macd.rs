//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line  = EMA(fast) - EMA(slow)
//! Signal     = EMA(signal) of the MACD line
//! Oscillator = MACD Line - Signal
//!
//! Default parameters: fast=12, slow=26, signal=9 (observations, not calendar time).
//! Every EMA is seeded with the first observation, so there is no warm-up
//! prefix. A zero period makes the whole series undefined.

use crate::domain::indicator::{
    ema_values, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::price::AssetSeries;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    series: &AssetSeries,
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    if fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries::undefined(indicator_type, series);
    }

    let prices = series.prices();
    let ema_fast = ema_values(&prices, fast);
    let ema_slow = ema_values(&prices, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    let values = series
        .points()
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(p, (&line, &signal))| IndicatorPoint {
            date: p.date,
            value: Some(IndicatorValue::Macd {
                line,
                signal,
                oscillator: line - signal,
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
