//! dualmomentum: ETF return normalization, MACD/RSI indicators and a
//! dual-momentum allocation engine.
//!
//! Hexagonal architecture: pure computation in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
