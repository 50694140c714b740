//! Rolling-window indicators.
//!
//! This crate provides the streaming indicators the engine evaluates every bar:
//! - `RollingWindow`: fixed-capacity buffer with an O(1) ready flag
//! - `DonchianChannel`: lagged high/low/mid/width envelope over price
//! - `RollingStochastic`: min-max normalization of a metric to 0..=100
//!
//! The `simd` module holds batch versions of the channel bands used for
//! benchmarking and cross-checking the streaming implementation.

pub mod channel;
pub mod rolling;
pub mod simd;
pub mod stochastic;

pub use channel::{ChannelBands, DonchianChannel};
pub use rolling::RollingWindow;
pub use stochastic::RollingStochastic;
