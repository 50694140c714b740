//! Trading signals for the COT breakout strategy.
//!
//! This crate provides:
//! - The price breakout signal (intraday or close-only)
//! - The positioning signal family built on stochastic-normalized COT metrics
//! - A closed registry of positioning signal kinds, resolved at configuration time

pub mod breakout;
mod kind;
pub mod positioning;

pub use breakout::{BreakoutMode, BreakoutReading, BreakoutSignal};
pub use kind::PositioningSignalKind;
pub use positioning::{
    ClusteringSizeSignal, ConcentrationSignal, NetExposureSignal, PositioningSignal, Thresholds,
};
