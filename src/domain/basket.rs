//! The ETF basket: anchor, equity universe and bond universe.

use crate::domain::allocation::DEFENSIVE_PICKS;
use crate::domain::error::DualMomentumError;
use std::collections::HashSet;

/// Short descriptions of the default basket's funds.
const DESCRIPTIONS: &[(&str, &str)] = &[
    ("SPLG", "Tracks the S&P 500 index."),
    ("QQQM", "Tracks the NASDAQ-100 index."),
    ("EFA", "Tracks large-cap developed markets outside North America."),
    ("SHY", "Tracks short-term US Treasury bonds."),
    ("IEF", "Tracks intermediate-term US Treasury bonds."),
    ("TLT", "Tracks long-term US Treasury bonds."),
    ("TIP", "Tracks US Treasury inflation-protected securities (TIPS)."),
    ("LQD", "Tracks investment-grade corporate bonds."),
    ("HYG", "Tracks high-yield (junk) corporate bonds."),
    ("RWX", "Tracks international real estate investment trusts (REITs)."),
    ("EMB", "Tracks emerging-market bonds."),
];

pub fn describe(ticker: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(ticker))
        .map(|&(_, d)| d)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basket {
    pub anchor: String,
    /// Growth candidates after the anchor, in tie-break order.
    pub equities: Vec<String>,
    /// Defensive candidates, in tie-break order.
    pub bonds: Vec<String>,
}

impl Default for Basket {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            anchor: "SPLG".to_string(),
            equities: owned(&["SPLG", "QQQM", "EFA"]),
            bonds: owned(&["SHY", "IEF", "TLT", "TIP", "LQD", "HYG", "RWX", "EMB"]),
        }
    }
}

impl Basket {
    pub fn new(
        anchor: impl Into<String>,
        equities: Vec<String>,
        bonds: Vec<String>,
    ) -> Result<Self, DualMomentumError> {
        let anchor = anchor.into().trim().to_uppercase();
        if anchor.is_empty() {
            return Err(DualMomentumError::invalid_input("anchor ticker is empty"));
        }
        if bonds.len() < DEFENSIVE_PICKS {
            return Err(DualMomentumError::invalid_input(format!(
                "bond universe needs at least {} tickers, got {}",
                DEFENSIVE_PICKS,
                bonds.len()
            )));
        }
        Ok(Self {
            anchor,
            equities,
            bonds,
        })
    }

    /// Anchor, equities, then bonds, without repeats.
    pub fn all_tickers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(&self.anchor)
            .chain(&self.equities)
            .chain(&self.bonds)
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }
}
