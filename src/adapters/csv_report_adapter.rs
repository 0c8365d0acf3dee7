//! CSV export adapter implementing ReportPort.
//!
//! Returns are written wide: a `date` column followed by one column per
//! ticker over the unified timeline. Indicators are written long, one row
//! per observation. Undefined values are empty cells.

use crate::domain::error::DualMomentumError;
use crate::domain::indicator::IndicatorSet;
use crate::domain::returns::{build_unified_timeline, ReturnSeries};
use crate::ports::report_port::ReportPort;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn writer(output_path: &str) -> Result<csv::Writer<std::fs::File>, DualMomentumError> {
        if let Some(parent) = Path::new(output_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        csv::Writer::from_path(output_path).map_err(|e| csv_error(output_path, e))
    }
}

fn csv_error(output_path: &str, e: csv::Error) -> DualMomentumError {
    DualMomentumError::Data {
        reason: format!("failed to write {}: {}", output_path, e),
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write_returns(
        &self,
        series: &[ReturnSeries],
        output_path: &str,
    ) -> Result<(), DualMomentumError> {
        let mut wtr = Self::writer(output_path)?;

        let header = std::iter::once("date").chain(series.iter().map(|s| s.ticker.as_str()));
        wtr.write_record(header)
            .map_err(|e| csv_error(output_path, e))?;

        let timeline = build_unified_timeline(series);
        for date in &timeline {
            let row = std::iter::once(date.to_string())
                .chain(series.iter().map(|s| cell(s.value_on(*date))));
            wtr.write_record(row)
                .map_err(|e| csv_error(output_path, e))?;
        }

        wtr.flush()?;
        tracing::info!(
            path = output_path,
            tickers = series.len(),
            rows = timeline.len(),
            "wrote returns"
        );
        Ok(())
    }

    fn write_indicators(
        &self,
        set: &IndicatorSet,
        output_path: &str,
    ) -> Result<(), DualMomentumError> {
        let mut wtr = Self::writer(output_path)?;

        wtr.write_record(["date", "macd_oscillator", "rsi"])
            .map_err(|e| csv_error(output_path, e))?;
        for (date, macd, rsi) in set.rows() {
            wtr.write_record([date.to_string(), cell(macd), cell(rsi)])
                .map_err(|e| csv_error(output_path, e))?;
        }

        wtr.flush()?;
        tracing::info!(path = output_path, ticker = %set.ticker, rows = set.len(), "wrote indicators");
        Ok(())
    }
}
