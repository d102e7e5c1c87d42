//! Token monitoring module
//!
//! Periodic per-token evaluation, signal events and bounded history

mod events;
mod history;
mod scheduler;

pub use events::MonitorEvent;
pub use history::{SignalHistory, DEFAULT_HISTORY_LIMIT};
pub use scheduler::{MonitorError, TokenMonitor};

use crate::config::MonitorConfig;
use std::time::Duration;

/// Default period between scheduled analyses
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(300);

/// Runtime settings for [`TokenMonitor`]
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Period used when `start_monitoring` gets no interval
    pub default_interval: Duration,
    /// Signals kept per token
    pub history_limit: usize,
    /// Buffered events per subscriber before lagging
    pub event_capacity: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            default_interval: DEFAULT_MONITOR_INTERVAL,
            history_limit: DEFAULT_HISTORY_LIMIT,
            event_capacity: 256,
        }
    }
}

impl From<&MonitorConfig> for MonitorSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            default_interval: Duration::from_millis(config.interval_ms),
            history_limit: config.history_limit,
            ..Self::default()
        }
    }
}
