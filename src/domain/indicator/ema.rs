//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first price, then EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! No bias adjustment and no warm-up: every point is defined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::AssetSeries;

/// Raw EMA over arbitrary values. Empty when `period` is 0.
pub fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;

    for (i, &value) in values.iter().enumerate() {
        ema = if i == 0 {
            value
        } else {
            value * k + ema * (1.0 - k)
        };
        out.push(ema);
    }
    out
}

pub fn calculate_ema(series: &AssetSeries, period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::undefined(IndicatorType::Ema(period), series);
    }

    let ema = ema_values(&series.prices(), period);
    let values = series
        .points()
        .iter()
        .zip(ema)
        .map(|(p, v)| IndicatorPoint {
            date: p.date,
            value: Some(IndicatorValue::Simple(v)),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
