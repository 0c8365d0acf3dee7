//! Dual-momentum allocation decision.
//!
//! A positive trailing 1-year return on the anchor selects `growth`: the
//! single strongest equity (anchor first on ties) takes the whole amount.
//! Anything else selects `defensive`: the three strongest bonds by 6-month
//! return split the amount equally. Shares are whole units; whatever cannot
//! buy a whole share stays as cash.

use crate::domain::error::DualMomentumError;
use serde::Serialize;
use std::fmt;

/// Number of bond assets held in defensive mode.
pub const DEFENSIVE_PICKS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    Growth,
    Defensive,
}

impl AllocationMode {
    /// `growth` iff the anchor's trailing return is strictly positive.
    pub fn for_anchor_return(anchor_return: f64) -> Self {
        if anchor_return > 0.0 {
            AllocationMode::Growth
        } else {
            AllocationMode::Defensive
        }
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMode::Growth => write!(f, "growth"),
            AllocationMode::Defensive => write!(f, "defensive"),
        }
    }
}

/// Trailing return and latest price of one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetMomentum {
    pub ticker: String,
    pub trailing_return: f64,
    pub latest_price: Option<f64>,
}

impl AssetMomentum {
    pub fn new(ticker: impl Into<String>, trailing_return: f64, latest_price: Option<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            trailing_return,
            latest_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    /// Anchor asset with its trailing 1-year return.
    pub anchor: AssetMomentum,
    /// Equities with trailing 1-year returns, in priority order.
    pub equities: Vec<AssetMomentum>,
    /// Bonds with trailing 6-month returns, in declared order.
    pub bonds: Vec<AssetMomentum>,
    pub investment: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub ticker: String,
    pub price: Option<f64>,
    pub trailing_return: f64,
    pub allocated: f64,
    pub shares: u64,
    pub invested: f64,
}

impl Selection {
    pub fn leftover(&self) -> f64 {
        self.allocated - self.invested
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationDecision {
    pub mode: AllocationMode,
    pub anchor_return: f64,
    pub selections: Vec<Selection>,
    pub investment: Option<f64>,
    /// Sum of per-selection leftovers; `None` when no amount was given.
    pub cash_remainder: Option<f64>,
}

impl AllocationDecision {
    pub fn tickers(&self) -> Vec<&str> {
        self.selections.iter().map(|s| s.ticker.as_str()).collect()
    }

    pub fn total_invested(&self) -> f64 {
        self.selections.iter().map(|s| s.invested).sum()
    }
}

pub fn decide_allocation(
    request: &AllocationRequest,
) -> Result<AllocationDecision, DualMomentumError> {
    validate_request(request)?;

    let anchor_return = request.anchor.trailing_return;
    let mode = AllocationMode::for_anchor_return(anchor_return);

    let picks: Vec<&AssetMomentum> = match mode {
        AllocationMode::Growth => vec![strongest_equity(request)],
        AllocationMode::Defensive => strongest_bonds(&request.bonds)?,
    };

    let per_pick = request.investment.map(|amount| match mode {
        AllocationMode::Growth => amount,
        AllocationMode::Defensive => amount / DEFENSIVE_PICKS as f64,
    });

    let selections: Vec<Selection> = picks
        .into_iter()
        .map(|asset| size_selection(asset, per_pick.unwrap_or(0.0)))
        .collect();

    if mode == AllocationMode::Defensive {
        for s in selections.iter().filter(|s| s.trailing_return < 0.0) {
            tracing::warn!(
                ticker = %s.ticker,
                trailing_return = s.trailing_return,
                "defensive pick has a negative trailing return and is still allocated"
            );
        }
    }

    let cash_remainder = request
        .investment
        .map(|_| selections.iter().map(Selection::leftover).sum());

    tracing::debug!(%mode, anchor_return, picks = selections.len(), "allocation decided");

    Ok(AllocationDecision {
        mode,
        anchor_return,
        selections,
        investment: request.investment,
        cash_remainder,
    })
}

fn validate_request(request: &AllocationRequest) -> Result<(), DualMomentumError> {
    if let Some(amount) = request.investment {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DualMomentumError::invalid_input(format!(
                "investment amount must be a non-negative number, got {amount}"
            )));
        }
    }

    let all = std::iter::once(&request.anchor)
        .chain(&request.equities)
        .chain(&request.bonds);
    for asset in all {
        if !asset.trailing_return.is_finite() {
            return Err(DualMomentumError::invalid_input(format!(
                "trailing return for {} is not a finite number",
                asset.ticker
            )));
        }
    }
    Ok(())
}

/// Anchor first, then equities in declared order; first strict maximum wins.
fn strongest_equity(request: &AllocationRequest) -> &AssetMomentum {
    let candidates = request
        .equities
        .iter()
        .filter(|e| e.ticker != request.anchor.ticker);

    let mut best = &request.anchor;
    for candidate in candidates {
        if candidate.trailing_return > best.trailing_return {
            best = candidate;
        }
    }
    best
}

/// Top bonds by descending return; the stable sort keeps declared order on ties.
fn strongest_bonds(bonds: &[AssetMomentum]) -> Result<Vec<&AssetMomentum>, DualMomentumError> {
    if bonds.len() < DEFENSIVE_PICKS {
        return Err(DualMomentumError::invalid_input(format!(
            "defensive mode needs at least {} bond assets, got {}",
            DEFENSIVE_PICKS,
            bonds.len()
        )));
    }

    let mut ranked: Vec<&AssetMomentum> = bonds.iter().collect();
    ranked.sort_by(|a, b| b.trailing_return.total_cmp(&a.trailing_return));
    ranked.truncate(DEFENSIVE_PICKS);
    Ok(ranked)
}

/// floor(amount / price) whole shares; a missing or non-positive price buys nothing.
fn size_selection(asset: &AssetMomentum, allocated: f64) -> Selection {
    let price = asset.latest_price;
    let shares = match price {
        Some(p) if p.is_finite() && p > 0.0 => (allocated / p).floor() as u64,
        _ => {
            if allocated > 0.0 {
                tracing::warn!(
                    ticker = %asset.ticker,
                    price = ?price,
                    "no usable latest price, allocation kept as cash"
                );
            }
            0
        }
    };
    let invested = match price {
        Some(p) if shares > 0 => shares as f64 * p,
        _ => 0.0,
    };

    Selection {
        ticker: asset.ticker.clone(),
        price,
        trailing_return: asset.trailing_return,
        allocated,
        shares,
        invested,
    }
}
