//! Signal generation module
//!
//! Turns token metrics and risk into BUY / SELL / HOLD decisions

mod generator;
mod thresholds;
mod types;

pub use generator::SignalGenerator;
pub use thresholds::{ConfidenceWeights, SignalError, SignalThresholds, ThresholdOverride};
pub use types::{SignalKind, TradingSignal};
