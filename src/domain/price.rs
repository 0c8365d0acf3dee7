//! Price points and per-asset price series.

use crate::domain::error::DualMomentumError;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Ordered price history for one ticker. Dates are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl AssetSeries {
    /// Build a series from points already in date order.
    pub fn new(
        ticker: impl Into<String>,
        points: Vec<PricePoint>,
    ) -> Result<Self, DualMomentumError> {
        let ticker = ticker.into();
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(DualMomentumError::InvalidSeries {
                reason: format!(
                    "dates must be strictly increasing ({} followed by {})",
                    pair[0].date, pair[1].date
                ),
                ticker,
            });
        }
        Ok(Self { ticker, points })
    }

    /// Caller guarantees strictly increasing dates.
    pub(crate) fn from_ordered(ticker: impl Into<String>, points: Vec<PricePoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    /// Sort by date, then validate. Duplicate dates are still rejected.
    pub fn from_unsorted(
        ticker: impl Into<String>,
        mut points: Vec<PricePoint>,
    ) -> Result<Self, DualMomentumError> {
        points.sort_by_key(|p| p.date);
        Self::new(ticker, points)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }

    /// The `n` most recent points, or everything when shorter.
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}
