//! Technical indicator implementations.
//!
//! - `IndicatorPoint`: a single point in an indicator time series; `value`
//!   is `None` until the lookback window has filled
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values aligned with the prices

pub mod rsi;
pub mod sma;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl IndicatorPoint {
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

impl IndicatorType {
    /// Index of the first bar at which the indicator can be defined.
    pub fn warmup(&self) -> usize {
        match self {
            IndicatorType::Sma(period) => period.saturating_sub(1),
            IndicatorType::Rsi(period) => *period,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn undefined(indicator_type: IndicatorType, dates: impl Iterator<Item = NaiveDate>) -> Self {
        Self {
            indicator_type,
            values: dates.map(|date| IndicatorPoint { date, value: None }).collect(),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}
