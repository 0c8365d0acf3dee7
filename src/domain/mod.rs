//! Core domain types and logic. Pure functions over immutable inputs; no I/O.

pub mod price;
pub mod returns;
pub mod indicator;
pub mod allocation;
pub mod basket;
pub mod snapshot;
pub mod universe;
pub mod config_validation;
pub mod error;
