//! Replay of prepared data through the portfolio engine.

mod journal;
mod report;
mod runner;

pub use journal::IntentJournal;
pub use report::{IntentRecord, RunReport};
pub use runner::BacktestRunner;
