//! CLI interface for token-signals
//!
//! Provides subcommands for:
//! - `analyze`: One-off analysis and signal for a token
//! - `monitor`: Periodic monitoring until Ctrl-C
//! - `trending`: Trending tokens
//! - `holders`: Top holders of a token
//! - `ath`: All-time high of a token
//! - `config`: Show the effective configuration

mod analyze;
mod ath;
mod holders;
mod monitor;
mod trending;

pub use analyze::AnalyzeArgs;
pub use ath::AthArgs;
pub use holders::HoldersArgs;
pub use monitor::MonitorArgs;
pub use trending::TrendingArgs;

use crate::config::Config;
use crate::tracker::{ClientConfig, SolanaTrackerClient};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "token-signals")]
#[command(about = "BUY/SELL/HOLD signals for Solana tokens from Solana Tracker metrics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a token once and print its signal
    Analyze(AnalyzeArgs),
    /// Monitor tokens until interrupted
    Monitor(MonitorArgs),
    /// List trending tokens
    Trending(TrendingArgs),
    /// Show top holders of a token
    Holders(HoldersArgs),
    /// Show the all-time high of a token
    Ath(AthArgs),
    /// Show configuration
    Config,
}

/// Build a tracker client from the loaded configuration
pub(crate) fn tracker_client(config: &Config) -> anyhow::Result<SolanaTrackerClient> {
    Ok(SolanaTrackerClient::with_config(ClientConfig::from(
        &config.tracker,
    ))?)
}

/// USD amount as reported by the provider, trailing zeros dropped
pub(crate) fn usd(value: Decimal) -> String {
    format!("${}", value.normalize())
}

/// Percentage as reported by the provider, trailing zeros dropped
pub(crate) fn pct(value: Decimal) -> String {
    format!("{}%", value.normalize())
}
