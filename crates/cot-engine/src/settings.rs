//! Engine settings.

use std::collections::HashSet;

use cot_core::error::ConfigError;
use cot_signals::{BreakoutMode, PositioningSignalKind, Thresholds};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Which breakout a Flat instrument acts on when the long and the short
/// breakout fire on the same bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPrecedence {
    /// Treat the bar as a long breakout only.
    #[default]
    LongFirst,
    /// Treat the bar as a short breakout only.
    ShortFirst,
    /// Ignore both breakouts on that bar.
    Skip,
}

impl std::fmt::Display for EntryPrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryPrecedence::LongFirst => write!(f, "long_first"),
            EntryPrecedence::ShortFirst => write!(f, "short_first"),
            EntryPrecedence::Skip => write!(f, "skip"),
        }
    }
}

/// Validated, strongly typed engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Instruments in processing order
    pub universe: Vec<String>,
    /// Donchian channel lookback in bars
    pub channel_period: usize,
    /// Positioning stochastic lookback in records
    pub positioning_lookback: usize,
    /// Positioning classification bounds
    pub thresholds: Thresholds,
    /// Maximum entries per position (initial entry plus scale-ins)
    pub n_entries: u32,
    /// Intraday or close-only breakouts
    pub breakout_mode: BreakoutMode,
    /// Starting assets under management
    pub initial_aum: Decimal,
    /// Fraction of AUM at risk across a full position
    pub risk_fraction: Decimal,
    /// Maximum fraction of AUM per entry
    pub concentration_cap: Decimal,
    /// Positioning signal in use
    pub signal_kind: PositioningSignalKind,
    /// Double-breakout resolution
    pub entry_precedence: EntryPrecedence,
}

impl EngineSettings {
    /// Settings with every option at its default. The signal kind has no
    /// default and must be chosen.
    pub fn new(universe: Vec<String>, signal_kind: PositioningSignalKind) -> Self {
        Self {
            universe,
            channel_period: 20,
            positioning_lookback: 52,
            thresholds: Thresholds::default(),
            n_entries: 3,
            breakout_mode: BreakoutMode::Intraday,
            initial_aum: dec!(1500000),
            risk_fraction: dec!(0.005),
            concentration_cap: dec!(0.30),
            signal_kind,
            entry_precedence: EntryPrecedence::LongFirst,
        }
    }

    pub fn with_channel_period(mut self, period: usize) -> Self {
        self.channel_period = period;
        self
    }

    pub fn with_positioning_lookback(mut self, lookback: usize) -> Self {
        self.positioning_lookback = lookback;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_n_entries(mut self, n_entries: u32) -> Self {
        self.n_entries = n_entries;
        self
    }

    pub fn with_breakout_mode(mut self, mode: BreakoutMode) -> Self {
        self.breakout_mode = mode;
        self
    }

    pub fn with_initial_aum(mut self, aum: Decimal) -> Self {
        self.initial_aum = aum;
        self
    }

    pub fn with_entry_precedence(mut self, precedence: EntryPrecedence) -> Self {
        self.entry_precedence = precedence;
        self
    }

    /// Check ranges and the universe.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        let mut seen = HashSet::new();
        for symbol in &self.universe {
            if !seen.insert(symbol.as_str()) {
                return Err(ConfigError::DuplicateSymbol(symbol.clone()));
            }
        }
        if self.channel_period == 0 {
            return Err(ConfigError::invalid("channel_period", "must be at least 1"));
        }
        if self.positioning_lookback == 0 {
            return Err(ConfigError::invalid(
                "positioning_lookback",
                "must be at least 1",
            ));
        }
        if self.n_entries == 0 {
            return Err(ConfigError::invalid("n_entries", "must be at least 1"));
        }
        if self.initial_aum <= Decimal::ZERO {
            return Err(ConfigError::invalid("initial_aum", "must be positive"));
        }
        if self.risk_fraction <= Decimal::ZERO || self.risk_fraction > Decimal::ONE {
            return Err(ConfigError::invalid(
                "risk_fraction",
                "must lie in (0, 1]",
            ));
        }
        if self.concentration_cap <= Decimal::ZERO || self.concentration_cap > Decimal::ONE {
            return Err(ConfigError::invalid(
                "concentration_cap",
                "must lie in (0, 1]",
            ));
        }
        Ok(())
    }
}
