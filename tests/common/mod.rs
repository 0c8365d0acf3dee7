#![allow(dead_code)]

use chrono::NaiveDate;
use dualmomentum::cli::RunSettings;
use dualmomentum::domain::allocation::AssetMomentum;
use dualmomentum::domain::basket::Basket;
use dualmomentum::domain::error::DualMomentumError;
use dualmomentum::domain::indicator::IndicatorParams;
pub use dualmomentum::domain::price::{AssetSeries, PricePoint};
use dualmomentum::domain::snapshot::Lookbacks;
use dualmomentum::ports::data_port::DataPort;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    /// One point per calendar day starting 2024-01-01.
    pub fn with_prices(self, ticker: &str, prices: &[f64]) -> Self {
        self.with_points(ticker, daily_points("2024-01-01", prices))
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AssetSeries, DualMomentumError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(DualMomentumError::Data {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(ticker)
            .ok_or_else(|| DualMomentumError::MissingData {
                ticker: ticker.to_string(),
            })?
            .iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .copied()
            .collect();
        AssetSeries::new(ticker, points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, DualMomentumError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DualMomentumError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(DualMomentumError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn daily_points(start: &str, prices: &[f64]) -> Vec<PricePoint> {
    let start = date(start);
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
        .collect()
}

pub fn series(ticker: &str, prices: &[f64]) -> AssetSeries {
    AssetSeries::new(ticker, daily_points("2024-01-01", prices)).unwrap()
}

pub fn momentum(ticker: &str, trailing_return: f64, price: f64) -> AssetMomentum {
    AssetMomentum::new(ticker, trailing_return, Some(price))
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Anchor A; equities A, B, C; bonds X, Y, Z, W.
pub fn test_basket() -> Basket {
    Basket::new("A", owned(&["A", "B", "C"]), owned(&["X", "Y", "Z", "W"])).unwrap()
}

pub fn test_settings(basket: Basket) -> RunSettings {
    RunSettings {
        data_dir: PathBuf::from("unused"),
        start_date: NaiveDate::MIN,
        end_date: NaiveDate::MAX,
        basket,
        lookbacks: Lookbacks::default(),
        indicator_params: IndicatorParams::default(),
        investment: None,
    }
}

/// Bonds with returns X +3%, Y +7%, Z -1%, W +5% and prices 103, 107, 99, 105.
pub fn with_test_bonds(port: MockDataPort) -> MockDataPort {
    port.with_prices("X", &[100.0, 103.0])
        .with_prices("Y", &[100.0, 107.0])
        .with_prices("Z", &[100.0, 99.0])
        .with_prices("W", &[100.0, 105.0])
}
