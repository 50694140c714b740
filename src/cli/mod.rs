//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cot-breakout")]
#[command(author, version, about = "Breakout + Commitments of Traders futures decision engine")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "COT_CONFIG")]
    pub config: PathBuf,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay prepared data through the engine and report the intents
    Replay(ReplayArgs),
    /// List available positioning signals
    Signals,
    /// List registered futures contracts
    Contracts,
    /// Validate configuration
    ValidateConfig,
    /// Print the effective configuration
    ShowConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Positioning signal kind (e.g. concentration, pmpu_oi)
    #[arg(short, long)]
    pub signal: Option<String>,

    /// Symbols to trade (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Data directory holding price/ and cot/
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Use closing-price breakouts instead of intraday extremes
    #[arg(long)]
    pub close: bool,

    /// Entries per position, initial entry included
    #[arg(long)]
    pub n_entries: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the intent log to a JSON file
    #[arg(long)]
    pub save: Option<PathBuf>,
}
