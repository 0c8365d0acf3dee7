//! CSV directory data adapter.
//!
//! One `<TICKER>.csv` file per asset, with a header row. The date column is
//! `Date`; the price column is the adjusted close (`Adj Close`, `adj_close`,
//! `AdjClose`) when present, otherwise `Close`. Header matching ignores case,
//! spaces and underscores.

use crate::domain::error::DualMomentumError;
use crate::domain::price::{AssetSeries, PricePoint};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    price: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// All usable rows of a ticker's file, sorted by date.
    fn read_points(&self, ticker: &str) -> Result<Vec<PricePoint>, DualMomentumError> {
        let path = self.csv_path(ticker);
        if !path.is_file() {
            return Err(DualMomentumError::MissingData {
                ticker: ticker.to_string(),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| DualMomentumError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| DualMomentumError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let columns = locate_columns(headers, &path)?;

        let mut points = Vec::new();
        let mut skipped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| DualMomentumError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(columns.date).unwrap_or("");
            let date = parse_date(date_str).ok_or_else(|| DualMomentumError::Data {
                reason: format!("invalid date '{}' in {}", date_str, path.display()),
            })?;

            let price_str = record.get(columns.price).unwrap_or("");
            if is_blank_price(price_str) {
                skipped += 1;
                continue;
            }
            let price: f64 = price_str.parse().map_err(|e| DualMomentumError::Data {
                reason: format!(
                    "invalid price '{}' on {} in {}: {}",
                    price_str,
                    date,
                    path.display(),
                    e
                ),
            })?;
            if !price.is_finite() || price <= 0.0 {
                return Err(DualMomentumError::Data {
                    reason: format!(
                        "price must be positive and finite, got '{}' on {} in {}",
                        price_str,
                        date,
                        path.display()
                    ),
                });
            }

            points.push(PricePoint::new(date, price));
        }

        if skipped > 0 {
            tracing::warn!(ticker, skipped, "skipped rows without a price");
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect::<String>()
        .to_lowercase()
}

fn locate_columns(headers: &csv::StringRecord, path: &Path) -> Result<Columns, DualMomentumError> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let find = |name: &str| normalized.iter().position(|h| h == name);

    let date = find("date").ok_or_else(|| DualMomentumError::Data {
        reason: format!("missing Date column in {}", path.display()),
    })?;
    let price = find("adjclose")
        .or_else(|| find("close"))
        .ok_or_else(|| DualMomentumError::Data {
            reason: format!("missing Adj Close or Close column in {}", path.display()),
        })?;

    Ok(Columns { date, price })
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn is_blank_price(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("null")
        || value.eq_ignore_ascii_case("nan")
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AssetSeries, DualMomentumError> {
        let points: Vec<PricePoint> = self
            .read_points(ticker)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();

        tracing::debug!(ticker, points = points.len(), "loaded series");
        AssetSeries::new(ticker, points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, DualMomentumError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DualMomentumError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DualMomentumError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                if !ticker.is_empty() {
                    tickers.push(ticker.to_string());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DualMomentumError> {
        let points = match self.read_points(ticker) {
            Ok(points) => points,
            Err(DualMomentumError::MissingData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
    }
}
