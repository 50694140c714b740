//! Price breakout signal.
//!
//! Normalizes price against a lagged Donchian channel:
//! `score = 2 * (price - mid_band) / width`, clamped to [-2, 2].
//! A reading above 1 is a long breakout, below -1 a short breakout.

use cot_core::traits::StreamingIndicator;
use cot_core::types::{InstrumentBar, SignalValue};
use cot_indicators::{ChannelBands, DonchianChannel};
use serde::{Deserialize, Serialize};

/// Hard bound on the breakout score.
pub const SCORE_LIMIT: f64 = 2.0;

/// Which prices the breakout is measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakoutMode {
    /// Bar high for the long reading, bar low for the short reading.
    /// Entries execute at the channel band that was crossed.
    #[default]
    Intraday,
    /// Close for both readings; entries execute at the close.
    Close,
}

/// Breakout readings for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakoutReading {
    /// Long breakout score in [-2, 2]
    pub long_score: SignalValue,
    /// Short breakout score in [-2, 2]
    pub short_score: SignalValue,
    /// Channel the scores were measured against
    pub bands: ChannelBands,
    /// Execution price for a long entry on this bar
    pub long_entry_price: f64,
    /// Execution price for a short entry on this bar
    pub short_entry_price: f64,
}

impl BreakoutReading {
    /// Long breakout triggered (score above 1).
    #[inline]
    pub fn is_long_breakout(&self) -> bool {
        self.long_score > 1.0
    }

    /// Short breakout triggered (score below -1).
    #[inline]
    pub fn is_short_breakout(&self) -> bool {
        self.short_score < -1.0
    }

    /// Protective stop level, the channel midpoint.
    #[inline]
    pub fn stop_price(&self) -> f64 {
        self.bands.mid_band
    }
}

/// Normalize `price` against a channel.
///
/// Returns `None` for a degenerate channel or a non-finite result, so a zero
/// width is never divided into.
pub fn score(price: f64, bands: &ChannelBands) -> Option<SignalValue> {
    if bands.is_degenerate() {
        return None;
    }
    let raw = 2.0 * (price - bands.mid_band) / bands.width;
    if !raw.is_finite() {
        return None;
    }
    Some(raw.clamp(-SCORE_LIMIT, SCORE_LIMIT))
}

/// Streaming breakout signal over a Donchian channel.
#[derive(Debug, Clone)]
pub struct BreakoutSignal {
    channel: DonchianChannel,
    mode: BreakoutMode,
    last: Option<BreakoutReading>,
}

impl BreakoutSignal {
    /// Create a breakout signal over a channel of `period` bars.
    pub fn new(period: usize, mode: BreakoutMode) -> Self {
        Self {
            channel: DonchianChannel::new(period),
            mode,
            last: None,
        }
    }

    pub fn mode(&self) -> BreakoutMode {
        self.mode
    }

    fn read(&self, bar: &InstrumentBar, bands: ChannelBands) -> Option<BreakoutReading> {
        match self.mode {
            BreakoutMode::Intraday => Some(BreakoutReading {
                long_score: score(bar.high, &bands)?,
                short_score: score(bar.low, &bands)?,
                bands,
                long_entry_price: bands.high_band,
                short_entry_price: bands.low_band,
            }),
            BreakoutMode::Close => {
                let value = score(bar.close, &bands)?;
                Some(BreakoutReading {
                    long_score: value,
                    short_score: value,
                    bands,
                    long_entry_price: bar.close,
                    short_entry_price: bar.close,
                })
            }
        }
    }
}

impl StreamingIndicator for BreakoutSignal {
    type Input = InstrumentBar;
    type Output = BreakoutReading;

    fn update(&mut self, bar: InstrumentBar) -> Option<BreakoutReading> {
        self.last = self
            .channel
            .update(bar)
            .and_then(|bands| self.read(&bar, bands));
        self.last
    }

    fn current(&self) -> Option<BreakoutReading> {
        self.last
    }

    fn reset(&mut self) {
        self.channel.reset();
        self.last = None;
    }

    fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }

    fn period(&self) -> usize {
        self.channel.period()
    }

    fn name(&self) -> &str {
        match self.mode {
            BreakoutMode::Intraday => "Breakout (intraday)",
            BreakoutMode::Close => "Breakout (close)",
        }
    }
}
