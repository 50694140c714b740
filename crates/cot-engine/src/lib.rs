//! Portfolio decision engine.
//!
//! Each bar, the engine reads the breakout and positioning signals of every
//! instrument and decides which order intents to hand to the broker:
//! entries, scale-ins and the protective stop that guards every open position.

mod book;
mod engine;
mod settings;

pub use book::{InstrumentSnapshot, InstrumentStatus};
pub use engine::{BarContext, PortfolioEngine};
pub use settings::{EngineSettings, EntryPrecedence};
