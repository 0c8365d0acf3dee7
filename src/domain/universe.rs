//! Ticker lists and basket loading.
//!
//! Parses ticker lists from configuration and loads every series a basket
//! needs through a [`DataPort`], failing on the first ticker without data.

use crate::domain::basket::Basket;
use crate::domain::error::DualMomentumError;
use crate::domain::price::AssetSeries;
use crate::domain::snapshot::{Lookbacks, MarketSnapshot};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

/// Fetch each ticker in order. An absent or empty series is `MissingData`.
pub fn load_tickers(
    data_port: &dyn DataPort,
    tickers: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<AssetSeries>, DualMomentumError> {
    let mut loaded = Vec::with_capacity(tickers.len());

    for ticker in tickers {
        let series = data_port.fetch_series(ticker, start_date, end_date)?;
        if series.is_empty() {
            return Err(DualMomentumError::MissingData {
                ticker: ticker.clone(),
            });
        }
        tracing::debug!(ticker = %ticker, points = series.len(), "series loaded");
        loaded.push(series);
    }

    Ok(loaded)
}

/// Load every basket ticker into a snapshot. Series shorter than the
/// longest lookback are kept and logged; their returns use full history.
pub fn load_basket(
    data_port: &dyn DataPort,
    basket: &Basket,
    lookbacks: &Lookbacks,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<MarketSnapshot, DualMomentumError> {
    let tickers = basket.all_tickers();
    let series = load_tickers(data_port, &tickers, start_date, end_date)?;

    let longest = lookbacks.equity.max(lookbacks.bond);
    for s in series.iter().filter(|s| s.len() < longest) {
        tracing::warn!(
            ticker = s.ticker(),
            points = s.len(),
            lookback = longest,
            "history shorter than lookback, returns will use full history"
        );
    }

    tracing::info!(tickers = series.len(), %start_date, %end_date, "basket loaded");
    MarketSnapshot::new(series)
}
