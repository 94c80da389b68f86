//! One-shot backtest pipeline: signals → evaluation → metrics.
//!
//! Every call recomputes everything from the inputs; nothing is cached
//! between runs.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::StratlabError;
use crate::domain::evaluator::{evaluate, Evaluation};
use crate::domain::metrics::{analyze, PerformanceMetrics};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{generate, SignalSeries, StrategyKind, WarmupPolicy};

#[derive(Debug)]
pub struct BacktestReport {
    pub strategy: StrategyKind,
    pub prices: PriceSeries,
    pub signals: SignalSeries,
    pub evaluation: Evaluation,
    /// `Err(DegenerateSeries)` is kept here rather than failing the run,
    /// so the curves remain available.
    pub metrics: Result<PerformanceMetrics, StratlabError>,
}

pub fn run(prices: PriceSeries, config: &BacktestConfig) -> Result<BacktestReport, StratlabError> {
    config.validate()?;

    tracing::info!(
        ticker = %config.ticker,
        strategy = %config.strategy,
        bars = prices.len(),
        "running backtest"
    );

    let signals = generate(&prices, &config.strategy)?.with_warmup(config.warmup);
    let evaluation = evaluate(&prices, &signals)?;

    let metrics = match analyze(&evaluation.strategy_returns, config.trading_days_per_year) {
        Err(StratlabError::InsufficientData { .. }) => {
            // One bar past the first defined signal is needed for a return.
            let required = match config.warmup {
                WarmupPolicy::Undefined => config.strategy.indicator().warmup().saturating_add(2),
                WarmupPolicy::Flat => 2,
            };
            tracing::warn!(
                bars = prices.len(),
                required,
                "no strategy returns defined; series shorter than lookback"
            );
            Err(StratlabError::InsufficientData {
                available: prices.len(),
                required,
            })
        }
        other => other,
    };

    Ok(BacktestReport {
        strategy: config.strategy,
        prices,
        signals,
        evaluation,
        metrics,
    })
}
