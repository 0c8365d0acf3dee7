//! Immutable snapshot of materialized price series, keyed by ticker.
//!
//! Built once by the caller and passed by reference into every core
//! operation; nothing in the core keeps it between calls.

use crate::domain::allocation::{AllocationRequest, AssetMomentum};
use crate::domain::basket::Basket;
use crate::domain::error::DualMomentumError;
use crate::domain::indicator::{compute_indicators, IndicatorParams, IndicatorSet};
use crate::domain::price::AssetSeries;
use crate::domain::returns::{
    compute_returns_all, trailing_return, Baseline, Granularity, ReturnSeries, ONE_YEAR_POINTS,
    SIX_MONTH_POINTS,
};
use std::collections::HashMap;

/// Trailing windows, in observations, used for the allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookbacks {
    pub equity: usize,
    pub bond: usize,
}

impl Default for Lookbacks {
    fn default() -> Self {
        Self {
            equity: ONE_YEAR_POINTS,
            bond: SIX_MONTH_POINTS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    series: Vec<AssetSeries>,
    index: HashMap<String, usize>,
}

impl MarketSnapshot {
    /// Tickers must be unique.
    pub fn new(series: Vec<AssetSeries>) -> Result<Self, DualMomentumError> {
        let mut index = HashMap::with_capacity(series.len());
        for (i, s) in series.iter().enumerate() {
            if index.insert(s.ticker().to_string(), i).is_some() {
                return Err(DualMomentumError::invalid_input(format!(
                    "duplicate series for {}",
                    s.ticker()
                )));
            }
        }
        Ok(Self { series, index })
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&AssetSeries> {
        self.index.get(ticker).map(|&i| &self.series[i])
    }

    /// The series for `ticker`; absent or empty is `MissingData`.
    pub fn require(&self, ticker: &str) -> Result<&AssetSeries, DualMomentumError> {
        match self.get(ticker) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(DualMomentumError::MissingData {
                ticker: ticker.to_string(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetSeries> {
        self.series.iter()
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.series.iter().map(AssetSeries::ticker).collect()
    }

    pub fn momentum(&self, ticker: &str, window: usize) -> Result<AssetMomentum, DualMomentumError> {
        let series = self.require(ticker)?;
        let (value, _) = trailing_return(series, window)?;
        Ok(AssetMomentum::new(ticker, value, series.latest_price()))
    }

    pub fn allocation_request(
        &self,
        basket: &Basket,
        lookbacks: &Lookbacks,
        investment: Option<f64>,
    ) -> Result<AllocationRequest, DualMomentumError> {
        let anchor = self.momentum(&basket.anchor, lookbacks.equity)?;
        let equities = basket
            .equities
            .iter()
            .map(|t| self.momentum(t, lookbacks.equity))
            .collect::<Result<Vec<_>, _>>()?;
        let bonds = basket
            .bonds
            .iter()
            .map(|t| self.momentum(t, lookbacks.bond))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AllocationRequest {
            anchor,
            equities,
            bonds,
            investment,
        })
    }

    /// One return series per asset, in snapshot order.
    pub fn returns(
        &self,
        granularity: Granularity,
        baseline: Baseline,
    ) -> Result<Vec<ReturnSeries>, DualMomentumError> {
        compute_returns_all(self.iter(), granularity, baseline)
    }

    pub fn indicators(
        &self,
        ticker: &str,
        params: &IndicatorParams,
    ) -> Result<IndicatorSet, DualMomentumError> {
        Ok(compute_indicators(self.require(ticker)?, params))
    }
}
