//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig, StrategySettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Prefix of environment overrides, e.g. `COT__STRATEGY__N_ENTRIES=2`.
pub const ENV_PREFIX: &str = "COT";

/// Load configuration from an optional file and the environment.
///
/// Missing sections and keys fall back to their defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_layered(path, ENV_PREFIX)
}

fn load_layered(path: Option<&Path>, env_prefix: &str) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("strategy.universe")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
