//! Error types for the COT breakout engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level error.
///
/// Every variant aborts a run. Non-fatal conditions (inactive bars, skipped
/// sizings) never surface as a `CotError`.
#[derive(Error, Debug)]
pub enum CotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Configuration faults, raised before any bar is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required option: {0}")]
    Missing(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown positioning signal kind '{name}', expected one of: {valid}")]
    UnknownSignalKind { name: String, valid: String },

    #[error("Symbol not registered in the contract schedule: {0}")]
    UnregisteredSymbol(String),

    #[error("Instrument universe is empty")]
    EmptyUniverse,

    #[error("Duplicate symbol in universe: {0}")]
    DuplicateSymbol(String),
}

impl ConfigError {
    /// Shorthand for an [`ConfigError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Sizing degeneracies. Non-fatal: the entry is skipped for that bar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("Worst-case loss is zero (price {price}, stop {stop}, multiplier {multiplier})")]
    ZeroRisk {
        price: Decimal,
        stop: Decimal,
        multiplier: Decimal,
    },

    #[error("Execution price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Price is not representable: {0}")]
    Unrepresentable(f64),
}

/// Portfolio engine faults.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No live protective stop to replace for {symbol}")]
    NoLiveStop { symbol: String },

    #[error("Stop fill reported for {symbol}, which has no live protective stop")]
    UnexpectedStopFill { symbol: String },

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),
}

/// Broker collaborator faults.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    #[error("Order intent rejected: {0}")]
    Rejected(String),
}

/// Data loading errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Duplicate date {date} in {symbol}")]
    DuplicateDate { symbol: String, date: NaiveDate },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Loader task failed: {0}")]
    Task(String),
}

/// Result type alias for engine operations.
pub type CotResult<T> = Result<T, CotError>;
