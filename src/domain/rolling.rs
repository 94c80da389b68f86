//! Fixed-size sliding mean shared by the SMA and RSI indicators.
//!
//! The running sum is updated in O(1) per push. `mean()` is `None` until
//! `period` values have been pushed.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    /// A zero `period` yields an accumulator that never fills. The window
    /// grows on demand, so `period` may exceed any realistic series length.
    pub fn new(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::new(),
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.period == 0 {
            return;
        }
        if self.window.len() == self.period {
            if let Some(oldest) = self.window.pop_front() {
                self.sum -= oldest;
            }
        }
        self.window.push_back(value);
        self.sum += value;
    }

    pub fn is_full(&self) -> bool {
        self.period > 0 && self.window.len() == self.period
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_full() {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }
}
