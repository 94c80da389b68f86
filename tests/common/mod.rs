#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use stratlab::domain::backtest::BacktestConfig;
use stratlab::domain::error::StratlabError;
use stratlab::domain::pipeline::BacktestReport;
pub use stratlab::domain::price_series::{PricePoint, PriceSeries};
use stratlab::domain::signal::StrategyKind;
use stratlab::ports::data_port::PriceDataPort;
use stratlab::ports::report_port::ReportPort;

pub struct MockPriceDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, ticker: &str, prices: PriceSeries) -> Self {
        self.data.insert(ticker.to_string(), prices.points().to_vec());
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, StratlabError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(StratlabError::Data {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(ticker)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, StratlabError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

/// Records the paths it was asked to write instead of touching disk.
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(PathBuf, usize)>>,
}

impl RecordingReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReportPort {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), StratlabError> {
        self.written
            .borrow_mut()
            .push((output_path.to_path_buf(), report.prices.len()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily closes starting 2024-01-01.
pub fn make_prices(closes: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    PriceSeries::from_pairs(
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (start + chrono::Duration::days(i as i64), c)),
    )
    .unwrap()
}

/// `count` closes rising by 1.0 per day from `start_price`.
pub fn linear_prices(count: usize, start_price: f64) -> PriceSeries {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    make_prices(&closes)
}

pub fn sample_config(strategy: StrategyKind) -> BacktestConfig {
    BacktestConfig::new("TEST", date(2024, 1, 1), date(2025, 12, 31), strategy)
}
