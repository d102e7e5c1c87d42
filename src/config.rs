//! Configuration types for token-signals

use crate::signal::{ConfidenceWeights, SignalError, SignalGenerator, SignalThresholds};
use crate::telemetry::LogFormat;
use crate::tracker::SOLANA_TRACKER_API_URL;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable carrying the API key
pub const ENV_API_KEY: &str = "SOLANA_TRACKER_API_KEY";
/// Environment variable overriding the monitor interval (ms)
pub const ENV_MONITORING_INTERVAL: &str = "MONITORING_INTERVAL";
/// Environment variable overriding the price change threshold (%)
pub const ENV_PRICE_CHANGE: &str = "SIGNAL_THRESHOLD_PRICE_CHANGE";
/// Environment variable overriding the liquidity floor (USD)
pub const ENV_LIQUIDITY: &str = "SIGNAL_THRESHOLD_LIQUIDITY";
/// Environment variable listing tokens to monitor, comma separated
pub const ENV_MONITORED_TOKENS: &str = "MONITORED_TOKENS";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Signal(#[from] SignalError),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub signal: SignalConfig,
    pub monitor: MonitorConfig,
    pub telemetry: TelemetryConfig,
}

/// Solana Tracker client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Minimum gap between any two requests
    pub request_spacing_ms: u64,
    /// Attempts per request when throttled
    pub max_attempts: u32,
    pub timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: SOLANA_TRACKER_API_URL.to_string(),
            api_key: None,
            request_spacing_ms: 2000,
            max_attempts: 3,
            timeout_secs: 10,
        }
    }
}

/// Signal thresholds and confidence weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub price_change_pct: Decimal,
    pub liquidity_floor: Decimal,
    pub risk_ceiling: Decimal,
    pub weights: ConfidenceWeights,
}

impl Default for SignalConfig {
    fn default() -> Self {
        let thresholds = SignalThresholds::default();
        Self {
            price_change_pct: thresholds.price_change_pct,
            liquidity_floor: thresholds.liquidity_floor,
            risk_ceiling: thresholds.risk_ceiling,
            weights: ConfidenceWeights::default(),
        }
    }
}

impl SignalConfig {
    pub fn thresholds(&self) -> SignalThresholds {
        SignalThresholds {
            price_change_pct: self.price_change_pct,
            liquidity_floor: self.liquidity_floor,
            risk_ceiling: self.risk_ceiling,
        }
    }

    /// Build a generator from these settings
    pub fn generator(&self) -> Result<SignalGenerator, SignalError> {
        SignalGenerator::new(self.thresholds(), self.weights.clone())
    }
}

/// Monitor scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Default period between analyses of one token
    pub interval_ms: u64,
    /// Signals kept per token
    pub history_limit: usize,
    /// Tokens monitored by the `monitor` command when none are given
    pub tokens: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 300_000,
            history_limit: 100,
            tokens: Vec::new(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Prometheus listener port; no exporter when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load a TOML file, apply environment overrides and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`; unset or blank variables are ignored
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(key) = get(ENV_API_KEY) {
            self.tracker.api_key = Some(key);
        }
        if let Some(value) = get(ENV_MONITORING_INTERVAL) {
            self.monitor.interval_ms = parse_env(ENV_MONITORING_INTERVAL, value)?;
        }
        if let Some(value) = get(ENV_PRICE_CHANGE) {
            self.signal.price_change_pct = parse_env(ENV_PRICE_CHANGE, value)?;
        }
        if let Some(value) = get(ENV_LIQUIDITY) {
            self.signal.liquidity_floor = parse_env(ENV_LIQUIDITY, value)?;
        }
        if let Some(value) = get(ENV_MONITORED_TOKENS) {
            self.monitor.tokens = value
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("tracker.base_url is empty".into()));
        }
        if self.tracker.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "tracker.max_attempts must be at least 1".into(),
            ));
        }
        if self.tracker.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "tracker.timeout_secs must be positive".into(),
            ));
        }
        if self.monitor.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "monitor.interval_ms must be positive".into(),
            ));
        }
        if self.monitor.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "monitor.history_limit must be at least 1".into(),
            ));
        }
        self.signal.thresholds().validate()?;
        self.signal.weights.validate()?;
        Ok(())
    }
}

fn parse_env<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}
