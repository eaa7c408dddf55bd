//! CLI interface for riskcore
//!
//! Provides subcommands for:
//! - `size`: Size a trade with the configured position sizer
//! - `levels`: Stop-loss and take-profit for an entry
//! - `config`: Show effective configuration

mod levels;
mod size;

pub use levels::LevelsArgs;
pub use size::SizeArgs;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::model::Candle;

#[derive(Parser, Debug)]
#[command(name = "riskcore")]
#[command(about = "Risk management and position sizing for a crypto trading bot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Size a trade with the configured position sizer
    Size(SizeArgs),
    /// Stop-loss and take-profit levels for an entry
    Levels(LevelsArgs),
    /// Show effective configuration
    Config,
}

impl Commands {
    /// Run the selected subcommand
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        match self {
            Commands::Size(args) => args.execute(config, json),
            Commands::Levels(args) => args.execute(config, json),
            Commands::Config => print_config(config, json),
        }
    }
}

fn print_config(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

/// Print a command report as pretty JSON
pub(crate) fn print_json<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Load OHLCV bars from a JSON array file, oldest first
pub(crate) fn load_history(path: &Path) -> anyhow::Result<Vec<Candle>> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read price history {}", path.display()))?;
    let candles: Vec<Candle> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse price history {}", path.display()))?;
    tracing::debug!(bars = candles.len(), "Loaded price history");
    Ok(candles)
}
