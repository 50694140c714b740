//! Rolling stochastic normalization.

use cot_core::traits::StreamingIndicator;

use crate::rolling::RollingWindow;

/// Position of the latest value within its rolling min-max range, 0..=100.
///
/// `stoch = 100 * (m - min) / (max - min)` over the last `period` values,
/// the current one included. Undefined while warming up and whenever the
/// window is flat (`max == min`).
///
/// A non-finite input still takes a slot in the window as a gap, and the
/// reading stays undefined until that gap has been evicted. The window
/// therefore always spans the last `period` updates, so stochastics fed
/// from the same records cover the same records.
#[derive(Debug, Clone)]
pub struct RollingStochastic {
    window: RollingWindow,
    gaps: usize,
    last: Option<f64>,
}

impl RollingStochastic {
    /// Create a stochastic over `period` observations (default lookback is 52).
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            window: RollingWindow::new(period),
            gaps: 0,
            last: None,
        }
    }

    /// Normalize `value` against a min-max range.
    #[inline]
    pub fn normalize(value: f64, min: f64, max: f64) -> Option<f64> {
        let range = max - min;
        if !(range.is_finite() && range > 0.0) {
            return None;
        }
        Some((value - min) / range * 100.0)
    }

    fn compute(&self) -> Option<f64> {
        if !self.window.is_ready() || self.gaps > 0 {
            return None;
        }
        let value = self.window.latest()?;
        Self::normalize(value, self.window.min()?, self.window.max()?)
    }
}

impl StreamingIndicator for RollingStochastic {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        let value = if value.is_finite() {
            value
        } else {
            self.gaps += 1;
            f64::NAN
        };
        if let Some(evicted) = self.window.push(value) {
            if evicted.is_nan() {
                self.gaps -= 1;
            }
        }
        self.last = self.compute();
        self.last
    }

    fn current(&self) -> Option<f64> {
        self.last
    }

    fn reset(&mut self) {
        self.window.clear();
        self.gaps = 0;
        self.last = None;
    }

    fn is_ready(&self) -> bool {
        self.window.is_ready()
    }

    fn period(&self) -> usize {
        self.window.capacity()
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}
