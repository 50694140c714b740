//! Core data types for the COT breakout engine.

mod bar;
mod order;
mod positioning;
mod position;

pub use bar::{InstrumentBar, InstrumentSeries};
pub use order::{OrderIntent, OrderKind, Side};
pub use position::{Position, PositionState};
pub use positioning::{PositioningMetric, PositioningRecord, PositioningSeries};

/// Bounded signal score.
///
/// Breakout scores are continuous in [-2, 2]; positioning classifications
/// take the discrete values documented on each signal.
pub type SignalValue = f64;
