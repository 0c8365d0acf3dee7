//! Configuration validation.
//!
//! Validates every config field before any data is loaded. The typed
//! readers here are shared with the CLI builders so a value that passes
//! validation is read back the same way.

use crate::domain::allocation::DEFENSIVE_PICKS;
use crate::domain::error::DualMomentumError;
use crate::domain::indicator::{macd, rsi};
use crate::domain::returns::{ONE_YEAR_POINTS, SIX_MONTH_POINTS};
use crate::domain::universe::parse_tickers;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), DualMomentumError> {
    validate_data_dir(config)?;
    validate_dates(config)?;
    validate_basket(config)?;
    validate_lookbacks(config)?;
    validate_indicators(config)?;
    optional_investment(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DualMomentumError {
    DualMomentumError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// A positive integer, or `default` when the key is absent.
pub fn positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, DualMomentumError> {
    match config.get_non_empty(section, key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(invalid(
                section,
                key,
                format!("{key} must be a positive integer, got '{raw}'"),
            )),
        },
    }
}

pub fn optional_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, DualMomentumError> {
    config
        .get_non_empty(section, key)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                invalid(
                    section,
                    key,
                    format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            })
        })
        .transpose()
}

pub fn ticker_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Vec<String>>, DualMomentumError> {
    config
        .get_non_empty(section, key)
        .map(|raw| parse_tickers(&raw).map_err(|e| invalid(section, key, e.to_string())))
        .transpose()
}

/// `[allocation] investment`: absent, or a finite non-negative amount.
pub fn optional_investment(config: &dyn ConfigPort) -> Result<Option<f64>, DualMomentumError> {
    match config.get_non_empty("allocation", "investment") {
        None => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
            _ => Err(invalid(
                "allocation",
                "investment",
                format!("investment must be a non-negative number, got '{raw}'"),
            )),
        },
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), DualMomentumError> {
    match config.get_non_empty("data", "dir") {
        Some(_) => Ok(()),
        None => Err(DualMomentumError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DualMomentumError> {
    let start = optional_date(config, "data", "start_date")?;
    let end = optional_date(config, "data", "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid(
                "data",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

fn validate_basket(config: &dyn ConfigPort) -> Result<(), DualMomentumError> {
    if let Some(anchor) = config.get_non_empty("basket", "anchor") {
        if anchor.contains(',') {
            return Err(invalid("basket", "anchor", "anchor must be a single ticker"));
        }
    }

    ticker_list(config, "basket", "equities")?;

    if let Some(bonds) = ticker_list(config, "basket", "bonds")? {
        if bonds.len() < DEFENSIVE_PICKS {
            return Err(invalid(
                "basket",
                "bonds",
                format!(
                    "bonds must list at least {} tickers, got {}",
                    DEFENSIVE_PICKS,
                    bonds.len()
                ),
            ));
        }
    }
    Ok(())
}

fn validate_lookbacks(config: &dyn ConfigPort) -> Result<(), DualMomentumError> {
    positive_int(config, "momentum", "equity_lookback", ONE_YEAR_POINTS)?;
    positive_int(config, "momentum", "bond_lookback", SIX_MONTH_POINTS)?;
    Ok(())
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<(), DualMomentumError> {
    let fast = positive_int(config, "indicators", "macd_fast", macd::DEFAULT_FAST)?;
    let slow = positive_int(config, "indicators", "macd_slow", macd::DEFAULT_SLOW)?;
    positive_int(config, "indicators", "macd_signal", macd::DEFAULT_SIGNAL)?;
    positive_int(config, "indicators", "rsi_period", rsi::DEFAULT_PERIOD)?;

    if fast >= slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    Ok(())
}
