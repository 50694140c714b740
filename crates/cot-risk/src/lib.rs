//! Risk management for the COT breakout strategy.
//!
//! This crate provides:
//! - Risk-budget position sizing with a concentration cap
//! - The futures contract schedule (multiplier, commission, margin)

mod contracts;
mod sizer;

pub use contracts::ContractSchedule;
pub use sizer::{to_decimal, RiskBudgetSizer, Sizer, SizingRequest};
