//! Collaborator traits for the COT breakout engine.

mod broker;
mod contract;
mod indicator;

pub use broker::{Broker, BrokerEvent};
pub use contract::{ContractLookup, ContractSpec};
pub use indicator::StreamingIndicator;
