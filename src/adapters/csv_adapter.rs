//! CSV file price data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv`. The header must name a `date` column
//! (`YYYY-MM-DD`) and one of `adj_close`, `Adj Close` or `close`, matched
//! case-insensitively in that order of preference.

use crate::domain::error::StratlabError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const CLOSE_COLUMNS: [&str; 3] = ["adj_close", "adj close", "close"];

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, StratlabError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| StratlabError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| StratlabError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let date_idx = column_index(&headers, &["date"]).ok_or_else(|| StratlabError::Data {
            reason: "missing date column".into(),
        })?;
        let close_idx =
            column_index(&headers, &CLOSE_COLUMNS).ok_or_else(|| StratlabError::Data {
                reason: "missing adj_close column".into(),
            })?;

        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StratlabError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_idx).ok_or_else(|| StratlabError::Data {
                reason: "missing date value".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                StratlabError::Data {
                    reason: format!("invalid date format '{}': {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let adjusted_close: f64 = record
                .get(close_idx)
                .ok_or_else(|| StratlabError::Data {
                    reason: "missing close value".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| StratlabError::Data {
                    reason: format!("invalid close value on {}: {}", date, e),
                })?;

            points.push(PricePoint {
                date,
                adjusted_close,
            });
        }

        points.sort_by_key(|p| p.date);
        tracing::debug!(ticker, rows = points.len(), path = %path.display(), "loaded prices");
        PriceSeries::new(points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, StratlabError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StratlabError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StratlabError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            let Some(ticker) = name_str.strip_suffix(".csv") else {
                continue;
            };
            // fetch_prices opens `<TICKER>.csv`, so other spellings are unreachable
            if ticker.is_empty() || ticker != ticker.to_uppercase() {
                tracing::debug!(file = %name_str, "skipping file without an uppercase ticker name");
                continue;
            }
            tickers.push(ticker.to_string());
        }

        tickers.sort();
        Ok(tickers)
    }
}
