//! RSI (Relative Strength Index).
//!
//! Average gain/loss is a plain rolling mean over the last n changes, not
//! Wilder's recursive smoothing. The first observation has no predecessor
//! and counts as a zero change inside the first window.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (this includes a perfectly flat window).
//!
//! Warmup: first (n-1) points are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::AssetSeries;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(series: &AssetSeries, period: usize) -> IndicatorSeries {
    if period == 0 || series.len() < period {
        return IndicatorSeries::undefined(IndicatorType::Rsi(period), series);
    }

    let points = series.points();
    let mut gains: Vec<f64> = Vec::with_capacity(points.len());
    let mut losses: Vec<f64> = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let change = if i == 0 {
            0.0
        } else {
            point.price - points[i - 1].price
        };
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let values = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let value = if i + 1 < period {
                None
            } else {
                let start = i + 1 - period;
                let avg_gain = gains[start..=i].iter().sum::<f64>() / period as f64;
                let avg_loss = losses[start..=i].iter().sum::<f64>() / period as f64;
                Some(IndicatorValue::Simple(rsi_from_averages(avg_gain, avg_loss)))
            };
            IndicatorPoint {
                date: point.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
