//! Strategy selection and signal generation.
//!
//! Each strategy maps a [`PriceSeries`] to a [`SignalSeries`] aligned
//! index-for-index with the prices. A signal is `None` wherever the
//! underlying indicator has not yet filled its lookback window.

use crate::domain::error::StratlabError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use std::fmt;

pub const DEFAULT_MOMENTUM_WINDOW: usize = 50;
pub const DEFAULT_RSI_WINDOW: usize = 14;
pub const DEFAULT_RSI_OVERSOLD_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyKind {
    /// Long while the close is above its trailing simple moving average.
    Momentum { window: usize },
    /// Long while RSI is below the oversold threshold.
    MeanReversion {
        window: usize,
        oversold_threshold: f64,
    },
}

impl StrategyKind {
    pub fn momentum() -> Self {
        StrategyKind::Momentum {
            window: DEFAULT_MOMENTUM_WINDOW,
        }
    }

    pub fn mean_reversion() -> Self {
        StrategyKind::MeanReversion {
            window: DEFAULT_RSI_WINDOW,
            oversold_threshold: DEFAULT_RSI_OVERSOLD_THRESHOLD,
        }
    }

    pub fn indicator(&self) -> IndicatorType {
        match *self {
            StrategyKind::Momentum { window } => IndicatorType::Sma(window),
            StrategyKind::MeanReversion { window, .. } => IndicatorType::Rsi(window),
        }
    }

    pub fn validate(&self) -> Result<(), StratlabError> {
        match *self {
            StrategyKind::Momentum { window } => {
                if window == 0 {
                    return Err(StratlabError::invalid_config(
                        "momentum_window",
                        "window must be positive",
                    ));
                }
            }
            StrategyKind::MeanReversion {
                window,
                oversold_threshold,
            } => {
                if window == 0 {
                    return Err(StratlabError::invalid_config(
                        "rsi_window",
                        "window must be positive",
                    ));
                }
                if !(oversold_threshold > 0.0 && oversold_threshold < 100.0) {
                    return Err(StratlabError::invalid_config(
                        "rsi_oversold_threshold",
                        format!("{} is outside (0, 100)", oversold_threshold),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Momentum { window } => write!(f, "Momentum ({}D MA)", window),
            StrategyKind::MeanReversion {
                window,
                oversold_threshold,
            } => write!(f, "Mean Reversion (RSI {} < {})", window, oversold_threshold),
        }
    }
}

/// Long-only exposure for the next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Flat,
    Long,
}

impl Position {
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }
}

/// How signals before the lookback window has filled are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarmupPolicy {
    /// Pre-window signals stay undefined and yield undefined returns.
    #[default]
    Undefined,
    /// Pre-window signals are treated as a flat position.
    Flat,
}

impl std::str::FromStr for WarmupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "undefined" => Ok(WarmupPolicy::Undefined),
            "flat" => Ok(WarmupPolicy::Flat),
            other => Err(format!("unknown warmup policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub values: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Option<Position>> + '_ {
        self.values.iter().map(|p| p.position)
    }

    /// Index of the first defined signal, if any.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|p| p.position.is_some())
    }

    pub fn with_warmup(mut self, policy: WarmupPolicy) -> Self {
        if policy == WarmupPolicy::Flat {
            for point in &mut self.values {
                point.position.get_or_insert(Position::Flat);
            }
        }
        self
    }
}

pub fn generate(prices: &PriceSeries, strategy: &StrategyKind) -> Result<SignalSeries, StratlabError> {
    strategy.validate()?;

    let signals = match *strategy {
        StrategyKind::Momentum { window } => {
            let sma = calculate_sma(prices, window);
            momentum_signals(prices, &sma)
        }
        StrategyKind::MeanReversion {
            window,
            oversold_threshold,
        } => {
            let rsi = calculate_rsi(prices, window);
            oversold_signals(&rsi, oversold_threshold)
        }
    };

    tracing::debug!(
        strategy = %strategy,
        bars = prices.len(),
        first_defined = ?signals.first_defined(),
        "generated signals"
    );
    Ok(signals)
}

fn momentum_signals(prices: &PriceSeries, sma: &IndicatorSeries) -> SignalSeries {
    let values = prices
        .points()
        .iter()
        .zip(&sma.values)
        .map(|(price, ma)| SignalPoint {
            date: price.date,
            position: ma.value.map(|ma| {
                if price.adjusted_close > ma {
                    Position::Long
                } else {
                    Position::Flat
                }
            }),
        })
        .collect();
    SignalSeries { values }
}

fn oversold_signals(rsi: &IndicatorSeries, oversold_threshold: f64) -> SignalSeries {
    let values = rsi
        .values
        .iter()
        .map(|point| SignalPoint {
            date: point.date,
            position: point.value.map(|rsi| {
                if rsi < oversold_threshold {
                    Position::Long
                } else {
                    Position::Flat
                }
            }),
        })
        .collect();
    SignalSeries { values }
}
