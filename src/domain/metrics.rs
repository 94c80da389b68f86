//! Performance metrics and statistics over a strategy-return series.
//!
//! Only defined returns participate. Standard deviation is the population
//! form. The risk-free rate is zero.

use crate::domain::error::StratlabError;
use crate::domain::evaluator::{CumulativeSeries, ReturnSeries};

pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Below this the return series is treated as zero-variance.
pub const DEGENERATE_STDDEV_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub periods: usize,
}

pub fn analyze(
    strategy_returns: &ReturnSeries,
    trading_days_per_year: u32,
) -> Result<PerformanceMetrics, StratlabError> {
    let returns: Vec<f64> = strategy_returns.defined().collect();
    if returns.is_empty() {
        return Err(StratlabError::InsufficientData {
            available: 0,
            required: 1,
        });
    }

    let cumulative = strategy_returns.cumulative();
    let total_return = cumulative.last_defined().map_or(0.0, |c| c - 1.0);

    let (mean, stddev) = mean_stddev(&returns);
    if stddev <= DEGENERATE_STDDEV_EPSILON {
        tracing::warn!(periods = returns.len(), "strategy returns have zero variance");
        return Err(StratlabError::DegenerateSeries {
            periods: returns.len(),
        });
    }

    let annualization = (trading_days_per_year as f64).sqrt();

    Ok(PerformanceMetrics {
        total_return,
        annualized_volatility: stddev * annualization,
        sharpe_ratio: mean / stddev * annualization,
        max_drawdown: compute_drawdown(&cumulative),
        periods: returns.len(),
    })
}

fn mean_stddev(returns: &[f64]) -> (f64, f64) {
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Largest peak-to-trough decline of the curve, as a fraction of the peak.
/// The curve is measured against the starting unit of capital.
fn compute_drawdown(cumulative: &CumulativeSeries) -> f64 {
    let mut peak = 1.0_f64;
    let mut max_dd = 0.0_f64;

    for growth in cumulative.values.iter().filter_map(|p| p.value) {
        if growth > peak {
            peak = growth;
        } else if peak > 0.0 {
            let dd = (peak - growth) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluator::ReturnPoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_returns(values: &[Option<f64>]) -> ReturnSeries {
        ReturnSeries {
            values: values
                .iter()
                .enumerate()
                .map(|(i, &value)| ReturnPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn metrics_known_values() {
        let returns = make_returns(&[None, Some(0.01), Some(-0.01), Some(0.02), Some(0.0)]);
        let metrics = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap();

        let mean: f64 = 0.02 / 4.0;
        let var: f64 = [0.01, -0.01, 0.02, 0.0]
            .iter()
            .map(|r: &f64| (r - mean).powi(2))
            .sum::<f64>()
            / 4.0;
        let sd = var.sqrt();

        assert_eq!(metrics.periods, 4);
        assert_relative_eq!(
            metrics.total_return,
            1.01 * 0.99 * 1.02 * 1.0 - 1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            metrics.annualized_volatility,
            sd * 252f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            metrics.sharpe_ratio,
            mean / sd * 252f64.sqrt(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn metrics_trading_days_configurable() {
        let returns = make_returns(&[Some(0.01), Some(-0.02), Some(0.03)]);
        let daily = analyze(&returns, 252).unwrap();
        let weekly = analyze(&returns, 52).unwrap();

        assert_relative_eq!(
            daily.annualized_volatility / weekly.annualized_volatility,
            (252.0f64 / 52.0).sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(daily.total_return, weekly.total_return);
    }

    #[test]
    fn metrics_all_zero_degenerate() {
        let returns = make_returns(&[None, Some(0.0), Some(0.0), Some(0.0)]);
        let err = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap_err();
        assert!(matches!(err, StratlabError::DegenerateSeries { periods: 3 }));
    }

    #[test]
    fn metrics_constant_nonzero_degenerate() {
        let returns = make_returns(&[Some(0.01); 30]);
        let err = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap_err();
        assert!(matches!(err, StratlabError::DegenerateSeries { .. }));
    }

    #[test]
    fn metrics_single_value_degenerate() {
        let returns = make_returns(&[None, Some(0.05)]);
        let err = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap_err();
        assert!(matches!(err, StratlabError::DegenerateSeries { periods: 1 }));
    }

    #[test]
    fn metrics_no_defined_returns() {
        let returns = make_returns(&[None, None]);
        let err = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap_err();
        assert!(matches!(err, StratlabError::InsufficientData { .. }));
    }

    #[test]
    fn metrics_finite() {
        let returns = make_returns(&[Some(0.03), Some(-0.01), Some(0.0), Some(0.02)]);
        let metrics = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap();
        assert!(metrics.total_return.is_finite());
        assert!(metrics.annualized_volatility.is_finite());
        assert!(metrics.sharpe_ratio.is_finite());
    }

    #[test]
    fn metrics_max_drawdown() {
        // curve: 1.1, 0.88, 0.968
        let returns = make_returns(&[Some(0.10), Some(-0.20), Some(0.10)]);
        let metrics = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap();
        assert_relative_eq!(metrics.max_drawdown, 0.20, epsilon = 1e-12);
    }

    #[test]
    fn metrics_drawdown_from_initial_capital() {
        let returns = make_returns(&[Some(-0.10), Some(0.05)]);
        let metrics = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap();
        assert_relative_eq!(metrics.max_drawdown, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn metrics_no_drawdown_when_rising() {
        let returns = make_returns(&[Some(0.01), Some(0.02), Some(0.03)]);
        let metrics = analyze(&returns, TRADING_DAYS_PER_YEAR).unwrap();
        assert_eq!(metrics.max_drawdown, 0.0);
        assert!(metrics.sharpe_ratio > 0.0);
    }
}
