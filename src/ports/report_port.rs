//! Series export port trait.

use crate::domain::error::DualMomentumError;
use crate::domain::indicator::IndicatorSet;
use crate::domain::returns::ReturnSeries;

/// Port for writing computed series to an output destination.
pub trait ReportPort {
    /// Several return series side by side over their unified timeline.
    fn write_returns(
        &self,
        series: &[ReturnSeries],
        output_path: &str,
    ) -> Result<(), DualMomentumError>;

    fn write_indicators(
        &self,
        set: &IndicatorSet,
        output_path: &str,
    ) -> Result<(), DualMomentumError>;
}
