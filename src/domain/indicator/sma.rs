//! Simple Moving Average over adjusted closes.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]), inclusive of the current bar.
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;
use crate::domain::rolling::RollingMean;

pub fn calculate_sma(prices: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::undefined(IndicatorType::Sma(period), prices.dates());
    }

    let mut window = RollingMean::new(period);
    let values = prices
        .points()
        .iter()
        .map(|p| {
            window.push(p.adjusted_close);
            IndicatorPoint {
                date: p.date,
                value: window.mean(),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
