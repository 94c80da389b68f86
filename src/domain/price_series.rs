//! Adjusted-close price series and derived period returns.

use crate::domain::error::StratlabError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adjusted_close: f64,
}

/// Prices ordered by strictly increasing date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, rejecting non-increasing dates and prices that are
    /// not finite and positive. An empty input is accepted.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, StratlabError> {
        for (i, point) in points.iter().enumerate() {
            if !point.adjusted_close.is_finite() || point.adjusted_close <= 0.0 {
                return Err(StratlabError::InvalidPriceSeries {
                    index: i,
                    reason: format!("price {} must be finite and positive", point.adjusted_close),
                });
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(StratlabError::InvalidPriceSeries {
                    index: i,
                    reason: format!(
                        "date {} does not follow {}",
                        point.date,
                        points[i - 1].date
                    ),
                });
            }
        }
        Ok(Self { points })
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, StratlabError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, adjusted_close)| PricePoint {
                    date,
                    adjusted_close,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.adjusted_close)
    }

    /// close[t] / close[t-1] - 1; `None` at t = 0.
    pub fn period_returns(&self) -> Vec<Option<f64>> {
        let mut returns = Vec::with_capacity(self.points.len());
        for (i, point) in self.points.iter().enumerate() {
            if i == 0 {
                returns.push(None);
            } else {
                returns.push(Some(point.adjusted_close / self.points[i - 1].adjusted_close - 1.0));
            }
        }
        returns
    }
}
