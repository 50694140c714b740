//! Donchian price channel.

use cot_core::traits::StreamingIndicator;
use cot_core::types::InstrumentBar;
use serde::{Deserialize, Serialize};

use crate::rolling::RollingWindow;

/// Channel envelope for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelBands {
    /// Highest high over the lookback
    pub high_band: f64,
    /// Lowest low over the lookback
    pub low_band: f64,
    /// (high_band + low_band) / 2
    pub mid_band: f64,
    /// high_band - low_band
    pub width: f64,
}

impl ChannelBands {
    /// Build bands from the extremes.
    pub fn from_extremes(high_band: f64, low_band: f64) -> Self {
        Self {
            high_band,
            low_band,
            mid_band: (high_band + low_band) / 2.0,
            width: high_band - low_band,
        }
    }

    /// A channel that cannot be divided into (zero or invalid width).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.width > 0.0 && self.mid_band.is_finite())
    }
}

/// Donchian channel over the last N bars.
///
/// The bands reported for a bar are computed from the N bars *before* it,
/// so a decision never uses the bar's own high or low.
#[derive(Debug, Clone)]
pub struct DonchianChannel {
    period: usize,
    highs: RollingWindow,
    lows: RollingWindow,
    last: Option<ChannelBands>,
}

impl DonchianChannel {
    /// Create a channel over `period` bars (default strategy period is 20).
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            highs: RollingWindow::new(period),
            lows: RollingWindow::new(period),
            last: None,
        }
    }

    fn bands(&self) -> Option<ChannelBands> {
        if !self.highs.is_ready() {
            return None;
        }
        Some(ChannelBands::from_extremes(self.highs.max()?, self.lows.min()?))
    }
}

impl StreamingIndicator for DonchianChannel {
    type Input = InstrumentBar;
    type Output = ChannelBands;

    fn update(&mut self, bar: InstrumentBar) -> Option<ChannelBands> {
        // Bands first, then admit the current bar: one-bar lag.
        self.last = self.bands();
        self.highs.push(bar.high);
        self.lows.push(bar.low);
        self.last
    }

    fn current(&self) -> Option<ChannelBands> {
        self.last
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.last = None;
    }

    fn is_ready(&self) -> bool {
        self.highs.is_ready()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "Donchian"
    }
}
