//! RSI (Relative Strength Index) over adjusted closes.
//!
//! Average gain/loss are simple rolling means of the last n price changes:
//! - gain[t] = max(C[t] - C[t-1], 0)
//! - loss[t] = max(C[t-1] - C[t], 0)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are undefined (need n price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;
use crate::domain::rolling::RollingMean;

pub fn calculate_rsi(prices: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::undefined(IndicatorType::Rsi(period), prices.dates());
    }

    let points = prices.points();
    let mut avg_gain = RollingMean::new(period);
    let mut avg_loss = RollingMean::new(period);
    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        if i == 0 {
            values.push(IndicatorPoint {
                date: point.date,
                value: None,
            });
            continue;
        }

        let change = point.adjusted_close - points[i - 1].adjusted_close;
        avg_gain.push(change.max(0.0));
        avg_loss.push((-change).max(0.0));

        let value = match (avg_gain.mean(), avg_loss.mean()) {
            (Some(gain), Some(loss)) => Some(rsi_from_averages(gain, loss)),
            _ => None,
        };
        values.push(IndicatorPoint {
            date: point.date,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    // Rolling sums can drift a hair below zero after a window of zeros.
    if avg_loss <= 0.0 {
        return 100.0;
    }
    let rs = avg_gain.max(0.0) / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_prices(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_pairs(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| (start + chrono::Duration::days(i as i64), c)),
        )
        .unwrap()
    }

    #[test]
    fn rsi_empty() {
        let series = calculate_rsi(&PriceSeries::default(), 14);
        assert!(series.values.is_empty());
    }

    #[test]
    fn rsi_single_bar() {
        let series = calculate_rsi(&make_prices(&[100.0]), 14);
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].is_valid());
    }

    #[test]
    fn rsi_warmup_period() {
        let closes: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_prices(&closes), 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..14 {
            assert!(!series.values[i].is_valid(), "Bar {} should be undefined", i);
        }
        assert!(series.values[14].is_valid(), "Bar 14 should be defined");
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_prices(&closes), 14);
        assert_eq!(series.values[14].value, Some(100.0));
    }

    #[test]
    fn rsi_flat_window_is_100() {
        let series = calculate_rsi(&make_prices(&[50.0; 20]), 14);
        for point in &series.values[14..] {
            assert_eq!(point.value, Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_prices(&closes), 14);
        let rsi = series.values[14].value.unwrap();
        assert!(rsi.abs() < 1e-12, "RSI should be 0 when all losses");
    }

    #[test]
    fn rsi_known_calculation() {
        // changes: +2, -1, +1, -2 → avg_gain 0.75, avg_loss 0.75 → RSI 50
        let series = calculate_rsi(&make_prices(&[10.0, 12.0, 11.0, 12.0, 10.0]), 4);
        assert!((series.values[4].value.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_uses_simple_rolling_mean() {
        // period 2: changes +4, -2, -2
        // at idx 2: gain 2.0, loss 1.0 → RS 2 → 66.67
        // at idx 3: gain 0.0, loss 2.0 → 0
        let series = calculate_rsi(&make_prices(&[10.0, 14.0, 12.0, 10.0]), 2);
        assert!((series.values[2].value.unwrap() - 200.0 / 3.0).abs() < 1e-9);
        assert!(series.values[3].value.unwrap().abs() < 1e-9);
    }

    #[test]
    fn rsi_in_range() {
        let closes: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_prices(&closes), 14);
        for point in &series.values {
            if let Some(rsi) = point.value {
                assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
            }
        }
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_prices(&[100.0, 101.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.is_valid()));
    }
}
