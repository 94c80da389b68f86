//! Core domain types and logic.

pub mod price_series;
pub mod rolling;
pub mod indicator;
pub mod signal;
pub mod evaluator;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod pipeline;
pub mod error;
