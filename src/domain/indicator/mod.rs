//! Technical indicators over a single asset's price series.
//!
//! - `IndicatorPoint`: one dated value; `None` marks the warm-up range
//! - `IndicatorValue`: the shape of a defined value
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a series aligned one-to-one with the input dates
//! - `IndicatorSet`: MACD oscillator and RSI for one asset, side by side

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::{calculate_ema, ema_values};
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;

use crate::domain::price::AssetSeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<IndicatorValue>,
}

impl IndicatorPoint {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        oscillator: f64,
    },
}

impl IndicatorValue {
    /// The headline number: the value itself, or the MACD oscillator.
    pub fn primary(&self) -> f64 {
        match *self {
            IndicatorValue::Simple(v) => v,
            IndicatorValue::Macd { oscillator, .. } => oscillator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Every point undefined, aligned with the series dates.
    pub(crate) fn undefined(indicator_type: IndicatorType, series: &AssetSeries) -> Self {
        Self {
            indicator_type,
            values: series
                .points()
                .iter()
                .map(|p| IndicatorPoint {
                    date: p.date,
                    value: None,
                })
                .collect(),
        }
    }

    pub fn primary_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|p| p.value.map(|v| v.primary()))
            .collect()
    }

    /// Number of leading undefined points.
    pub fn warmup_len(&self) -> usize {
        self.values.iter().take_while(|p| !p.is_defined()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// Window lengths for [`compute_indicators`], in observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            rsi_period: rsi::DEFAULT_PERIOD,
        }
    }
}

/// MACD oscillator and RSI for one asset, aligned with its dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub macd_oscillator: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `(date, macd_oscillator, rsi)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>, Option<f64>)> + '_ {
        self.dates
            .iter()
            .zip(&self.macd_oscillator)
            .zip(&self.rsi)
            .map(|((&d, &m), &r)| (d, m, r))
    }
}

pub fn compute_indicators(series: &AssetSeries, params: &IndicatorParams) -> IndicatorSet {
    let macd = calculate_macd(series, params.macd_fast, params.macd_slow, params.macd_signal);
    let rsi = calculate_rsi(series, params.rsi_period);

    IndicatorSet {
        ticker: series.ticker().to_string(),
        dates: series.dates(),
        macd_oscillator: macd.primary_values(),
        rsi: rsi.primary_values(),
    }
}
