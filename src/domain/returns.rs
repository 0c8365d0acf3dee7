//! Cumulative-return series and trailing returns.
//!
//! value[i] = price[i] / price[baseline] - 1, where the baseline is either
//! the first observation or the first of the `n` most recent observations.
//! Weekly and monthly series are resampled to period ends first, so their
//! returns are relative to the first resampled point.

use crate::domain::error::DualMomentumError;
use crate::domain::price::{AssetSeries, PricePoint};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Roughly one year of trading days.
pub const ONE_YEAR_POINTS: usize = 252;
/// Roughly six months of trading days.
pub const SIX_MONTH_POINTS: usize = 126;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// Label of the period containing `date`: the date itself, the Sunday
    /// closing its week, or the last day of its month.
    pub fn period_end(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => {
                let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(to_sunday))
                    .unwrap_or(NaiveDate::MAX)
            }
            Granularity::Monthly => date
                .with_day(1)
                .and_then(|first| first.checked_add_months(Months::new(1)))
                .and_then(|next| next.pred_opt())
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = DualMomentumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" | "1d" => Ok(Granularity::Daily),
            "weekly" | "w" | "1w" => Ok(Granularity::Weekly),
            "monthly" | "m" | "1m" => Ok(Granularity::Monthly),
            other => Err(DualMomentumError::invalid_input(format!(
                "unknown granularity '{other}' (expected daily, weekly or monthly)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// First observation of the (resampled) series.
    First,
    /// First of the `n` most recent observations.
    Trailing(usize),
}

/// Whether the requested trailing window was fully available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Coverage {
    Full,
    /// The series was shorter than the window; the full history was used.
    Degraded { requested: usize, available: usize },
}

impl Coverage {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Coverage::Degraded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    pub ticker: String,
    pub granularity: Granularity,
    pub coverage: Coverage,
    /// `points[0]` is the baseline and is always exactly 0.
    pub points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn baseline_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }
}

/// Keep the last observation of each period, labelled with the period end.
/// Periods without observations produce no point.
pub fn resample(series: &AssetSeries, granularity: Granularity) -> AssetSeries {
    if granularity == Granularity::Daily {
        return series.clone();
    }

    let mut points: Vec<PricePoint> = Vec::new();
    for point in series.points() {
        let label = granularity.period_end(point.date);
        match points.last_mut() {
            Some(last) if last.date == label => last.price = point.price,
            _ => points.push(PricePoint::new(label, point.price)),
        }
    }

    AssetSeries::from_ordered(series.ticker(), points)
}

/// Cumulative returns of `series` at `granularity` relative to `baseline`.
pub fn compute_returns(
    series: &AssetSeries,
    granularity: Granularity,
    baseline: Baseline,
) -> Result<ReturnSeries, DualMomentumError> {
    if series.is_empty() {
        return Err(DualMomentumError::MissingData {
            ticker: series.ticker().to_string(),
        });
    }

    let resampled = resample(series, granularity);
    let (window, coverage) = select_window(&resampled, baseline)?;
    let base = baseline_price(series.ticker(), window)?;

    let points = window
        .iter()
        .enumerate()
        .map(|(i, p)| ReturnPoint {
            date: p.date,
            value: if i == 0 { 0.0 } else { p.price / base - 1.0 },
        })
        .collect();

    Ok(ReturnSeries {
        ticker: series.ticker().to_string(),
        granularity,
        coverage,
        points,
    })
}

/// One return series per input series, in input order.
pub fn compute_returns_all<'a, I>(
    series: I,
    granularity: Granularity,
    baseline: Baseline,
) -> Result<Vec<ReturnSeries>, DualMomentumError>
where
    I: IntoIterator<Item = &'a AssetSeries>,
{
    series
        .into_iter()
        .map(|s| compute_returns(s, granularity, baseline))
        .collect()
}

/// Sorted union of every date that appears in any of `series`.
pub fn build_unified_timeline(series: &[ReturnSeries]) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|rs| rs.points.iter().map(|p| p.date))
        .collect();
    unique_dates.into_iter().collect()
}

/// Return from the first of the last `window` observations to the latest.
pub fn trailing_return(
    series: &AssetSeries,
    window: usize,
) -> Result<(f64, Coverage), DualMomentumError> {
    if series.is_empty() {
        return Err(DualMomentumError::MissingData {
            ticker: series.ticker().to_string(),
        });
    }
    let (points, coverage) = select_window(series, Baseline::Trailing(window))?;
    let base = baseline_price(series.ticker(), points)?;
    let value = points.last().map_or(0.0, |last| last.price / base - 1.0);
    Ok((value, coverage))
}

fn select_window(
    series: &AssetSeries,
    baseline: Baseline,
) -> Result<(&[PricePoint], Coverage), DualMomentumError> {
    match baseline {
        Baseline::First => Ok((series.points(), Coverage::Full)),
        Baseline::Trailing(0) => Err(DualMomentumError::invalid_input(
            "trailing window must be at least 1 observation",
        )),
        Baseline::Trailing(n) if series.len() < n => {
            tracing::debug!(
                ticker = series.ticker(),
                requested = n,
                available = series.len(),
                "history shorter than trailing window, using full history"
            );
            Ok((
                series.points(),
                Coverage::Degraded {
                    requested: n,
                    available: series.len(),
                },
            ))
        }
        Baseline::Trailing(n) => Ok((series.tail(n), Coverage::Full)),
    }
}

fn baseline_price(ticker: &str, window: &[PricePoint]) -> Result<f64, DualMomentumError> {
    let first = window.first().ok_or_else(|| DualMomentumError::MissingData {
        ticker: ticker.to_string(),
    })?;
    if !(first.price.is_finite() && first.price > 0.0) {
        return Err(DualMomentumError::InvalidSeries {
            ticker: ticker.to_string(),
            reason: format!(
                "baseline price on {} must be positive, got {}",
                first.date, first.price
            ),
        });
    }
    Ok(first.price)
}
