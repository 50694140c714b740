//! Per-instrument position bookkeeping.

use serde::{Deserialize, Serialize};

use super::Side;

/// Direction of an instrument's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    #[default]
    Flat,
    Long,
    Short,
}

impl PositionState {
    /// Side of the orders that open or add to this position.
    pub fn entry_side(&self) -> Option<Side> {
        match self {
            PositionState::Flat => None,
            PositionState::Long => Some(Side::Buy),
            PositionState::Short => Some(Side::Sell),
        }
    }

    /// Side of the protective stop for this position.
    pub fn exit_side(&self) -> Option<Side> {
        self.entry_side().map(|side| side.opposite())
    }

    pub fn is_open(&self) -> bool {
        *self != PositionState::Flat
    }
}

impl std::fmt::Display for PositionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionState::Flat => write!(f, "FLAT"),
            PositionState::Long => write!(f, "LONG"),
            PositionState::Short => write!(f, "SHORT"),
        }
    }
}

/// Position in a single instrument, in whole contracts.
///
/// Fills are assumed immediate: `open` and `add` are applied as soon as the
/// engine emits the market intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub state: PositionState,
    /// Contracts held (always non-negative; direction is in `state`)
    pub size: u64,
    /// Number of entries taken, including the initial one
    pub entry_count: u32,
}

impl Position {
    /// Open a new position from flat.
    pub fn open(&mut self, side: Side, size: u64) {
        self.state = match side {
            Side::Buy => PositionState::Long,
            Side::Sell => PositionState::Short,
        };
        self.size = size;
        self.entry_count = 1;
    }

    /// Scale into the existing position.
    pub fn add(&mut self, size: u64) {
        self.size += size;
        self.entry_count += 1;
    }

    /// Return to flat after the protective stop fills.
    pub fn reset(&mut self) {
        *self = Position::default();
    }

    pub fn is_flat(&self) -> bool {
        self.state == PositionState::Flat
    }

    /// Signed contracts (positive long, negative short).
    pub fn signed_size(&self) -> i64 {
        match self.state {
            PositionState::Flat => 0,
            PositionState::Long => self.size as i64,
            PositionState::Short => -(self.size as i64),
        }
    }
}
