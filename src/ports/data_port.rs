//! Data access port trait.

use crate::domain::error::DualMomentumError;
use crate::domain::price::AssetSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Adjusted-close series for `ticker` within `[start_date, end_date]`,
    /// ascending by date. An unknown ticker is an error, not an empty series.
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AssetSeries, DualMomentumError>;

    fn list_tickers(&self) -> Result<Vec<String>, DualMomentumError>;

    /// First date, last date and observation count, or `None` if the ticker
    /// has no usable rows.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DualMomentumError>;
}
