//! CLI command implementations.

pub mod contracts;
pub mod replay;
pub mod show_config;
pub mod signals;
pub mod validate;
