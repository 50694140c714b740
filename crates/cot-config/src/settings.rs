//! Configuration structures.

use std::collections::BTreeMap;

use cot_core::error::ConfigError;
use cot_core::traits::{ContractLookup, ContractSpec};
use cot_engine::{EngineSettings, EntryPrecedence};
use cot_risk::ContractSchedule;
use cot_signals::{BreakoutMode, PositioningSignalKind, Thresholds};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub data: DataSettings,
    /// Contract specs added to, or replacing, the built-in schedule
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractSpec>,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "cot-breakout".to_string(),
            environment: "research".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    /// Log file; when set, logs go to the file instead of stderr
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Location of the prepared data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding `price/` and `cot/`
    pub dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
        }
    }
}

/// Strategy options as written in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub universe: Vec<String>,
    pub channel_period: usize,
    pub positioning_lookback: usize,
    /// Threshold T in percentage points; bounds are T and 100 - T
    pub positioning_threshold: f64,
    pub n_entries: u32,
    pub intraday: bool,
    pub initial_aum: Decimal,
    pub risk_fraction: Decimal,
    pub concentration_cap: Decimal,
    /// Required: one of the positioning signal kinds
    pub positioning_signal_kind: Option<String>,
    pub entry_precedence: EntryPrecedence,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            universe: ["CC", "KC", "C", "CT", "W", "SB", "BO", "S", "SM"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            channel_period: 20,
            positioning_lookback: 52,
            positioning_threshold: Thresholds::DEFAULT_PERCENT,
            n_entries: 3,
            intraday: true,
            initial_aum: dec!(1500000),
            risk_fraction: dec!(0.005),
            concentration_cap: dec!(0.30),
            positioning_signal_kind: None,
            entry_precedence: EntryPrecedence::LongFirst,
        }
    }
}

impl AppConfig {
    /// Built-in contract schedule with the configured overrides applied.
    ///
    /// Symbols are upper-cased: the configuration loader folds table keys.
    pub fn contract_schedule(&self) -> ContractSchedule {
        self.contracts
            .iter()
            .fold(ContractSchedule::futures_defaults(), |schedule, (symbol, spec)| {
                schedule.with_contract(symbol.to_uppercase(), *spec)
            })
    }

    /// Resolve the strategy section into engine settings.
    ///
    /// Every configuration fault surfaces here, before any data is read.
    pub fn validate(&self) -> Result<EngineSettings, ConfigError> {
        let s = &self.strategy;

        let kind: PositioningSignalKind = s
            .positioning_signal_kind
            .as_deref()
            .ok_or_else(|| ConfigError::Missing("strategy.positioning_signal_kind".to_string()))?
            .parse()?;
        let thresholds = Thresholds::from_percent(s.positioning_threshold)?;
        let mode = if s.intraday {
            BreakoutMode::Intraday
        } else {
            BreakoutMode::Close
        };

        let mut settings = EngineSettings::new(s.universe.clone(), kind)
            .with_channel_period(s.channel_period)
            .with_positioning_lookback(s.positioning_lookback)
            .with_thresholds(thresholds)
            .with_n_entries(s.n_entries)
            .with_breakout_mode(mode)
            .with_initial_aum(s.initial_aum)
            .with_entry_precedence(s.entry_precedence);
        settings.risk_fraction = s.risk_fraction;
        settings.concentration_cap = s.concentration_cap;
        settings.validate()?;

        self.validate_contracts()?;
        self.contract_schedule().ensure_registered(&settings.universe)?;

        Ok(settings)
    }

    fn validate_contracts(&self) -> Result<(), ConfigError> {
        for (symbol, spec) in &self.contracts {
            if spec.multiplier <= Decimal::ZERO {
                return Err(ConfigError::invalid(
                    format!("contracts.{}.multiplier", symbol),
                    "must be positive",
                ));
            }
            if spec.commission_per_contract < Decimal::ZERO {
                return Err(ConfigError::invalid(
                    format!("contracts.{}.commission_per_contract", symbol),
                    "must not be negative",
                ));
            }
        }
        Ok(())
    }

    /// Serialize the effective configuration.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{load_config, load_layered};
    use std::io::Write;

    fn with_kind(kind: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.strategy.positioning_signal_kind = Some(kind.to_string());
        config
    }

    #[test]
    fn test_signal_kind_is_required() {
        let err = AppConfig::default().validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing("strategy.positioning_signal_kind".to_string())
        );
    }

    #[test]
    fn test_defaults_validate() {
        let settings = with_kind("mm_concentration").validate().unwrap();
        assert_eq!(settings.signal_kind, PositioningSignalKind::Concentration);
        assert_eq!(settings.universe.len(), 9);
        assert_eq!(settings.thresholds.llim, 30.0);
        assert_eq!(settings.breakout_mode, BreakoutMode::Intraday);
    }

    #[test]
    fn test_unknown_kind_and_threshold() {
        assert!(matches!(
            with_kind("cot_index").validate(),
            Err(ConfigError::UnknownSignalKind { .. })
        ));

        let mut config = with_kind("pmpu_oi");
        config.strategy.positioning_threshold = 0.7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "positioning_threshold"
        ));
    }

    #[test]
    fn test_unregistered_symbol() {
        let mut config = with_kind("pmpu_t");
        config.strategy.universe.push("LC".to_string());
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::UnregisteredSymbol("LC".to_string())
        );

        config.contracts.insert(
            "LC".to_string(),
            ContractSpec {
                commission_per_contract: dec!(12.82),
                multiplier: dec!(400),
                margin: None,
            },
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[strategy]
universe = ["C", "W"]
n_entries = 2
intraday = false
positioning_signal_kind = "clustering_size"
entry_precedence = "skip"

[contracts.C]
commission_per_contract = "5"
multiplier = "50"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.strategy.channel_period, 20);

        let settings = config.validate().unwrap();
        assert_eq!(settings.universe, vec!["C", "W"]);
        assert_eq!(settings.n_entries, 2);
        assert_eq!(settings.breakout_mode, BreakoutMode::Close);
        assert_eq!(settings.entry_precedence, EntryPrecedence::Skip);
        assert_eq!(
            config.contract_schedule().lookup("C").unwrap().commission_per_contract,
            dec!(5)
        );
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("COTENVTEST__LOGGING__LEVEL", "trace");
        std::env::set_var("COTENVTEST__STRATEGY__N_ENTRIES", "2");
        let config = load_layered(None, "COTENVTEST").unwrap();
        std::env::remove_var("COTENVTEST__LOGGING__LEVEL");
        std::env::remove_var("COTENVTEST__STRATEGY__N_ENTRIES");

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.app.name, "cot-breakout");
        assert_eq!(config.strategy.n_entries, 2);
        assert_eq!(config.strategy.channel_period, 20);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[app]
environment = "test"

[logging]
level = "debug"

[data]

[strategy]
positioning_signal_kind = "pmpu_oi"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.app.name, "cot-breakout");
        assert_eq!(config.app.environment, "test");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.file, None);
        assert_eq!(config.data.dir, "data");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip_keeps_strategy() {
        let config = with_kind("net_possize");
        let text = config.to_toml().unwrap();
        assert!(text.contains("positioning_signal_kind = \"net_possize\""));

        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.strategy.initial_aum, dec!(1500000));
        assert!(parsed.validate().is_ok());
    }
}
