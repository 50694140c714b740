//! Per-instrument decision state.

use cot_core::traits::{ContractSpec, StreamingIndicator};
use cot_core::types::{InstrumentBar, Position, PositionState, PositioningRecord, SignalValue};
use cot_indicators::ChannelBands;
use cot_signals::{BreakoutReading, BreakoutSignal, PositioningSignal};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decision state of an instrument as of its last processed bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentStatus {
    /// A required reading was undefined; the bar was skipped.
    Inactive,
    Flat,
    Long,
    Short,
}

impl std::fmt::Display for InstrumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentStatus::Inactive => write!(f, "INACTIVE"),
            InstrumentStatus::Flat => write!(f, "FLAT"),
            InstrumentStatus::Long => write!(f, "LONG"),
            InstrumentStatus::Short => write!(f, "SHORT"),
        }
    }
}

/// Read-only view of one instrument for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    pub status: InstrumentStatus,
    pub position: PositionState,
    /// Contracts held
    pub size: u64,
    pub entry_count: u32,
    /// Trigger price of the live protective stop
    pub live_stop: Option<Decimal>,
    pub channel: Option<ChannelBands>,
    pub breakout: Option<BreakoutReading>,
    pub positioning: Option<SignalValue>,
    pub bars_processed: u64,
    pub inactive_bars: u64,
    pub entries: u64,
    pub scale_ins: u64,
    pub skipped_sizings: u64,
    pub stop_fills: u64,
}

/// Signals, position and counters owned by one instrument.
pub(crate) struct InstrumentBook {
    pub symbol: String,
    pub spec: ContractSpec,
    pub breakout: BreakoutSignal,
    pub positioning: Box<dyn PositioningSignal>,
    pub position: Position,
    pub live_stop: Option<Decimal>,
    pub last_breakout: Option<BreakoutReading>,
    pub last_positioning: Option<SignalValue>,
    pub active: bool,
    pub bars_processed: u64,
    pub inactive_bars: u64,
    pub entries: u64,
    pub scale_ins: u64,
    pub skipped_sizings: u64,
    pub stop_fills: u64,
}

impl InstrumentBook {
    pub fn new(
        symbol: String,
        spec: ContractSpec,
        breakout: BreakoutSignal,
        positioning: Box<dyn PositioningSignal>,
    ) -> Self {
        Self {
            symbol,
            spec,
            breakout,
            positioning,
            position: Position::default(),
            live_stop: None,
            last_breakout: None,
            last_positioning: None,
            active: false,
            bars_processed: 0,
            inactive_bars: 0,
            entries: 0,
            scale_ins: 0,
            skipped_sizings: 0,
            stop_fills: 0,
        }
    }

    /// Advance every signal by one bar and return both readings when defined.
    ///
    /// A bar with non-finite prices is not fed to the channel. A missing
    /// positioning record leaves the positioning reading undefined for the bar.
    pub fn advance(
        &mut self,
        bar: &InstrumentBar,
        record: Option<&PositioningRecord>,
    ) -> Option<(BreakoutReading, SignalValue)> {
        self.bars_processed += 1;

        self.last_breakout = if bar.is_finite() {
            self.breakout.update(*bar)
        } else {
            None
        };
        self.last_positioning = record.and_then(|r| self.positioning.update(r));

        let readings = self.last_breakout.zip(self.last_positioning);
        self.active = readings.is_some();
        if !self.active {
            self.inactive_bars += 1;
        }
        readings
    }

    /// Return to Flat after the protective stop executed.
    pub fn close_position(&mut self) {
        self.position.reset();
        self.live_stop = None;
        self.stop_fills += 1;
    }

    pub fn status(&self) -> InstrumentStatus {
        if !self.active {
            return InstrumentStatus::Inactive;
        }
        match self.position.state {
            PositionState::Flat => InstrumentStatus::Flat,
            PositionState::Long => InstrumentStatus::Long,
            PositionState::Short => InstrumentStatus::Short,
        }
    }

    pub fn snapshot(&self) -> InstrumentSnapshot {
        InstrumentSnapshot {
            symbol: self.symbol.clone(),
            status: self.status(),
            position: self.position.state,
            size: self.position.size,
            entry_count: self.position.entry_count,
            live_stop: self.live_stop,
            channel: self.last_breakout.map(|r| r.bands),
            breakout: self.last_breakout,
            positioning: self.last_positioning,
            bars_processed: self.bars_processed,
            inactive_bars: self.inactive_bars,
            entries: self.entries,
            scale_ins: self.scale_ins,
            skipped_sizings: self.skipped_sizings,
            stop_fills: self.stop_fills,
        }
    }
}
