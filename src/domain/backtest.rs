//! Backtest configuration.
//!
//! BacktestConfig defines the parameters of a single run: which ticker and
//! date range to load, which strategy to apply, and how to annualize.

use crate::domain::error::StratlabError;
use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
use crate::domain::signal::{StrategyKind, WarmupPolicy};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub strategy: StrategyKind,
    pub warmup: WarmupPolicy,
    pub trading_days_per_year: u32,
}

impl BacktestConfig {
    pub fn new(
        ticker: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        strategy: StrategyKind,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            start_date,
            end_date,
            strategy,
            warmup: WarmupPolicy::default(),
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }

    pub fn validate(&self) -> Result<(), StratlabError> {
        self.strategy.validate()?;
        if self.trading_days_per_year == 0 {
            return Err(StratlabError::invalid_config(
                "trading_days_per_year",
                "must be positive",
            ));
        }
        if self.start_date > self.end_date {
            return Err(StratlabError::invalid_config(
                "start_date",
                "start_date must not be after end_date",
            ));
        }
        Ok(())
    }
}
