//! Configuration validation.
//!
//! Validates config fields before a backtest runs. Keys that may be
//! supplied on the command line instead (ticker, dates) are only checked
//! when present.

use crate::domain::error::StratlabError;
use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
use crate::domain::signal::{
    StrategyKind, WarmupPolicy, DEFAULT_MOMENTUM_WINDOW, DEFAULT_RSI_OVERSOLD_THRESHOLD,
    DEFAULT_RSI_WINDOW,
};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    validate_trading_days(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    let kind = config
        .get_string("strategy", "kind")
        .unwrap_or_else(|| "momentum".to_string());
    parse_strategy(config, &kind)?.validate().map_err(|e| match e {
        StratlabError::InvalidConfiguration { parameter, reason } => {
            StratlabError::ConfigInvalid {
                section: "strategy".to_string(),
                key: parameter,
                reason,
            }
        }
        other => other,
    })?;
    parse_warmup(config)?;
    Ok(())
}

/// Builds a [`StrategyKind`] from `kind` plus the window/threshold keys of
/// the `[strategy]` section, falling back to the defaults.
pub fn parse_strategy(config: &dyn ConfigPort, kind: &str) -> Result<StrategyKind, StratlabError> {
    match kind.trim().to_lowercase().replace('-', "_").as_str() {
        "momentum" => Ok(StrategyKind::Momentum {
            window: read_window(config, "momentum_window", DEFAULT_MOMENTUM_WINDOW)?,
        }),
        "mean_reversion" | "rsi" => Ok(StrategyKind::MeanReversion {
            window: read_window(config, "rsi_window", DEFAULT_RSI_WINDOW)?,
            oversold_threshold: config.get_double(
                "strategy",
                "rsi_oversold_threshold",
                DEFAULT_RSI_OVERSOLD_THRESHOLD,
            )?,
        }),
        other => Err(StratlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "kind".to_string(),
            reason: format!("unknown strategy '{}' (expected momentum or mean_reversion)", other),
        }),
    }
}

pub fn parse_warmup(config: &dyn ConfigPort) -> Result<WarmupPolicy, StratlabError> {
    match config.get_string("strategy", "warmup") {
        None => Ok(WarmupPolicy::default()),
        Some(s) => s.parse().map_err(|reason| StratlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "warmup".to_string(),
            reason,
        }),
    }
}

pub fn parse_date(value: &str, section: &str, key: &str) -> Result<NaiveDate, StratlabError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| StratlabError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("invalid {} format, expected YYYY-MM-DD", key),
    })
}

fn read_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, StratlabError> {
    let value = config.get_int("strategy", key, default as i64)?;
    if value < 1 {
        return Err(StratlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{} must be at least 1", key),
        });
    }
    Ok(value as usize)
}

pub fn read_trading_days(config: &dyn ConfigPort) -> Result<u32, StratlabError> {
    let value =
        config.get_int("backtest", "trading_days_per_year", TRADING_DAYS_PER_YEAR as i64)?;
    if !(1..=366).contains(&value) {
        return Err(StratlabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "trading_days_per_year".to_string(),
            reason: "trading_days_per_year must be between 1 and 366".to_string(),
        });
    }
    Ok(value as u32)
}

fn validate_trading_days(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    read_trading_days(config).map(|_| ())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), StratlabError> {
    let start = config
        .get_string("backtest", "start_date")
        .map(|s| parse_date(&s, "backtest", "start_date"))
        .transpose()?;
    let end = config
        .get_string("backtest", "end_date")
        .map(|s| parse_date(&s, "backtest", "end_date"))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(StratlabError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(())
}
