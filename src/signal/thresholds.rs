//! Decision thresholds and confidence weights

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid signal parameters
#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    /// A threshold is negative
    #[error("Threshold {name} must be non-negative, got {value}")]
    NegativeThreshold { name: &'static str, value: Decimal },
    /// A weight is outside [0, 1]
    #[error("Weight {name} must be between 0 and 1, got {value}")]
    WeightOutOfRange { name: &'static str, value: Decimal },
    /// A normalization cap is below one
    #[error("Cap {name} must be at least 1, got {value}")]
    CapBelowOne { name: &'static str, value: Decimal },
}

/// BUY/SELL decision thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    /// Absolute 24h price change (%) that counts as momentum
    pub price_change_pct: Decimal,
    /// USD liquidity a token must exceed to be bought
    pub liquidity_floor: Decimal,
    /// Risk score boundary: buy below, sell above
    pub risk_ceiling: Decimal,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            price_change_pct: dec!(5),
            liquidity_floor: dec!(500000),
            risk_ceiling: dec!(7),
        }
    }
}

impl SignalThresholds {
    pub fn validate(&self) -> Result<(), SignalError> {
        for (name, value) in [
            ("price_change_pct", self.price_change_pct),
            ("liquidity_floor", self.liquidity_floor),
            ("risk_ceiling", self.risk_ceiling),
        ] {
            if value < Decimal::ZERO {
                return Err(SignalError::NegativeThreshold { name, value });
            }
        }
        Ok(())
    }

    /// Copy of these thresholds with the given fields replaced
    pub fn merged(&self, overrides: &ThresholdOverride) -> Self {
        Self {
            price_change_pct: overrides.price_change_pct.unwrap_or(self.price_change_pct),
            liquidity_floor: overrides.liquidity_floor.unwrap_or(self.liquidity_floor),
            risk_ceiling: overrides.risk_ceiling.unwrap_or(self.risk_ceiling),
        }
    }
}

/// Partial threshold update; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdOverride {
    pub price_change_pct: Option<Decimal>,
    pub liquidity_floor: Option<Decimal>,
    pub risk_ceiling: Option<Decimal>,
}

/// Weights and normalization caps for the confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub price_change: Decimal,
    pub liquidity: Decimal,
    pub risk: Decimal,
    /// Price change (%) that saturates the momentum sub-score
    pub price_change_cap: Decimal,
    /// USD liquidity that saturates the liquidity sub-score
    pub liquidity_cap: Decimal,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            price_change: dec!(0.4),
            liquidity: dec!(0.3),
            risk: dec!(0.3),
            price_change_cap: dec!(20),
            liquidity_cap: dec!(1000000),
        }
    }
}

impl ConfidenceWeights {
    pub fn validate(&self) -> Result<(), SignalError> {
        for (name, value) in [
            ("price_change", self.price_change),
            ("liquidity", self.liquidity),
            ("risk", self.risk),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(SignalError::WeightOutOfRange { name, value });
            }
        }
        for (name, value) in [
            ("price_change_cap", self.price_change_cap),
            ("liquidity_cap", self.liquidity_cap),
        ] {
            if value < Decimal::ONE {
                return Err(SignalError::CapBelowOne { name, value });
            }
        }
        Ok(())
    }
}
