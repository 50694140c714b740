//! Core types and traits for the COT breakout engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (InstrumentBar, PositioningRecord and their series)
//! - Order intents and per-instrument position bookkeeping
//! - Collaborator traits for brokers, contract lookups and streaming indicators

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    BrokerError, ConfigError, CotError, CotResult, DataError, EngineError, SizingError,
};
pub use traits::*;
pub use types::*;
