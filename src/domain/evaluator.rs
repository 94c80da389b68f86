//! Strategy evaluation: lagged signal × period return, plus cumulative curves
//! for the strategy and a buy-and-hold baseline.
//!
//! A signal observed at the close of day t-1 governs exposure on day t.
//! Undefined inputs yield undefined outputs; a cumulative entry is defined
//! only where its own period return is defined, and the running product
//! starts at 1 before the first defined return.

use crate::domain::error::StratlabError;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::SignalSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Per-period returns aligned with the price series.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub values: Vec<ReturnPoint>,
}

/// Compounded growth of one unit of capital.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSeries {
    pub values: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|p| p.value)
    }

    pub fn cumulative(&self) -> CumulativeSeries {
        let mut growth = 1.0;
        let values = self
            .values
            .iter()
            .map(|p| ReturnPoint {
                date: p.date,
                value: p.value.map(|r| {
                    growth *= 1.0 + r;
                    growth
                }),
            })
            .collect();
        CumulativeSeries { values }
    }
}

impl CumulativeSeries {
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub market_returns: ReturnSeries,
    pub strategy_returns: ReturnSeries,
    pub market_cumulative: CumulativeSeries,
    pub strategy_cumulative: CumulativeSeries,
}

pub fn evaluate(prices: &PriceSeries, signal: &SignalSeries) -> Result<Evaluation, StratlabError> {
    if prices.is_empty() {
        return Err(StratlabError::InsufficientData {
            available: 0,
            required: 1,
        });
    }
    if signal.len() != prices.len() {
        return Err(StratlabError::SeriesLengthMismatch {
            expected: prices.len(),
            actual: signal.len(),
        });
    }

    let period_returns = prices.period_returns();
    let dates: Vec<NaiveDate> = prices.dates().collect();

    if let Some((index, (&expected, point))) = dates
        .iter()
        .zip(&signal.values)
        .enumerate()
        .find(|(_, (date, point))| **date != point.date)
    {
        return Err(StratlabError::SeriesMisaligned {
            index,
            expected,
            actual: point.date,
        });
    }

    let market_returns = ReturnSeries {
        values: dates
            .iter()
            .zip(&period_returns)
            .map(|(&date, &value)| ReturnPoint { date, value })
            .collect(),
    };

    let mut strategy_values = Vec::with_capacity(dates.len());
    for (t, (&date, &market)) in dates.iter().zip(&period_returns).enumerate() {
        let value = if t == 0 {
            None
        } else {
            match (signal.values[t - 1].position, market) {
                (Some(position), Some(r)) => Some(position.exposure() * r),
                _ => None,
            }
        };
        strategy_values.push(ReturnPoint { date, value });
    }
    let strategy_returns = ReturnSeries {
        values: strategy_values,
    };

    let market_cumulative = market_returns.cumulative();
    let strategy_cumulative = strategy_returns.cumulative();

    tracing::debug!(
        bars = prices.len(),
        market_final = ?market_cumulative.last_defined(),
        strategy_final = ?strategy_cumulative.last_defined(),
        "evaluated strategy"
    );

    Ok(Evaluation {
        market_returns,
        strategy_returns,
        market_cumulative,
        strategy_cumulative,
    })
}
