//! Broker collaborator trait.

use crate::error::BrokerError;
use crate::types::OrderIntent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Notification from the broker consumed by the engine's state transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrokerEvent {
    /// The instrument's protective stop was executed; the position is closed.
    StopFilled { instrument: String },
}

/// Trait for the broker collaborator.
///
/// The broker owns order matching, fills and cash/margin bookkeeping. The
/// engine only hands it intents and reads back equity and stop executions.
/// Calls are synchronous: each bar's decisions complete before the next bar.
pub trait Broker {
    /// Accept an order intent.
    ///
    /// A stop intent with `replaces_prior_stop` cancels the instrument's
    /// previous stop.
    fn submit(&mut self, intent: &OrderIntent) -> Result<(), BrokerError>;

    /// Signed contracts held in an instrument (positive long, negative short).
    fn current_position(&self, instrument: &str) -> i64;

    /// Current assets under management.
    fn current_aum(&self) -> Decimal;

    /// Take the notifications accumulated since the last call.
    fn drain_events(&mut self) -> Vec<BrokerEvent>;

    /// Get the broker name.
    fn name(&self) -> &str;
}
