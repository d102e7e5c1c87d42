//! Signal generation
//!
//! Maps a token analysis onto BUY / SELL / HOLD. Rules are checked in order
//! and the first match wins:
//!
//! 1. BUY when momentum is up, liquidity is above the floor and risk is
//!    below the ceiling.
//! 2. SELL when momentum is down or risk is above the ceiling.
//! 3. HOLD otherwise.
//!
//! A token with strong upward momentum but risk above the ceiling falls
//! through to SELL.

use super::thresholds::{ConfidenceWeights, SignalError, SignalThresholds, ThresholdOverride};
use super::types::{SignalKind, TradingSignal};
use crate::tracker::{TokenAnalysis, TokenMetrics};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Upper bound of the provider risk scale
const RISK_SCALE: Decimal = dec!(10);

/// Deterministic signal generator with adjustable thresholds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalGenerator {
    thresholds: SignalThresholds,
    weights: ConfidenceWeights,
}

impl SignalGenerator {
    /// Create a generator, rejecting invalid parameters
    pub fn new(
        thresholds: SignalThresholds,
        weights: ConfidenceWeights,
    ) -> Result<Self, SignalError> {
        thresholds.validate()?;
        weights.validate()?;
        Ok(Self {
            thresholds,
            weights,
        })
    }

    pub fn thresholds(&self) -> &SignalThresholds {
        &self.thresholds
    }

    pub fn weights(&self) -> &ConfidenceWeights {
        &self.weights
    }

    /// Replace some thresholds; nothing changes if the result is invalid
    pub fn apply_override(&mut self, overrides: &ThresholdOverride) -> Result<(), SignalError> {
        let merged = self.thresholds.merged(overrides);
        merged.validate()?;
        self.thresholds = merged;
        Ok(())
    }

    /// Replace the confidence weights; nothing changes if they are invalid
    pub fn set_weights(&mut self, weights: ConfidenceWeights) -> Result<(), SignalError> {
        weights.validate()?;
        self.weights = weights;
        Ok(())
    }

    /// Evaluate an analysis, stamped with the current time
    pub fn evaluate(&self, analysis: &TokenAnalysis, token_address: &str) -> TradingSignal {
        self.evaluate_at(analysis, token_address, Utc::now())
    }

    /// Evaluate an analysis with an explicit timestamp
    pub fn evaluate_at(
        &self,
        analysis: &TokenAnalysis,
        token_address: &str,
        timestamp: DateTime<Utc>,
    ) -> TradingSignal {
        let metrics = &analysis.metrics;
        let risk_score = analysis.risk_score;
        let kind = self.classify(metrics, risk_score);

        let confidence = match kind {
            SignalKind::Hold => 0,
            _ => self.confidence(metrics.price_change_24h, metrics.liquidity, risk_score),
        };

        TradingSignal {
            id: Uuid::new_v4(),
            kind,
            confidence,
            reason: self.reason(kind, metrics, risk_score),
            metrics: metrics.clone(),
            risk_score,
            timestamp,
            token_address: token_address.to_string(),
        }
    }

    /// Apply the ordered decision rules
    pub fn classify(&self, metrics: &TokenMetrics, risk_score: Decimal) -> SignalKind {
        let t = &self.thresholds;

        if metrics.price_change_24h > t.price_change_pct
            && metrics.liquidity > t.liquidity_floor
            && risk_score < t.risk_ceiling
        {
            SignalKind::Buy
        } else if metrics.price_change_24h < -t.price_change_pct || risk_score > t.risk_ceiling {
            SignalKind::Sell
        } else {
            SignalKind::Hold
        }
    }

    /// Weighted confidence in 0..=100
    ///
    /// Each sub-score is clamped to [0, 1] before weighting: momentum is
    /// `|change| / price_change_cap`, liquidity is `liquidity / liquidity_cap`
    /// and risk is inverted as `1 - risk / 10`. Arithmetic overflow
    /// saturates instead of panicking.
    pub fn confidence(&self, price_change: Decimal, liquidity: Decimal, risk_score: Decimal) -> u8 {
        let w = &self.weights;

        let momentum = unit_ratio(price_change.abs(), w.price_change_cap);
        let depth = unit_ratio(liquidity, w.liquidity_cap);
        let safety = Decimal::ONE
            .checked_sub(risk_score / RISK_SCALE)
            .map_or(Decimal::ZERO, unit);

        let blended = [
            (momentum, w.price_change),
            (depth, w.liquidity),
            (safety, w.risk),
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (score, weight)| {
            acc.checked_add(score.checked_mul(weight)?)
        });

        let score = blended
            .and_then(|b| b.checked_mul(dec!(100)))
            .map_or(dec!(100), |s| {
                s.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            })
            .clamp(Decimal::ZERO, dec!(100));

        score.to_u8().unwrap_or(0)
    }

    fn reason(&self, kind: SignalKind, metrics: &TokenMetrics, risk_score: Decimal) -> String {
        match kind {
            SignalKind::Buy => "Strong upward momentum with healthy metrics".to_string(),
            SignalKind::Sell => {
                let falling = metrics.price_change_24h < -self.thresholds.price_change_pct;
                let risky = risk_score > self.thresholds.risk_ceiling;
                match (falling, risky) {
                    (true, true) => "Negative momentum and high risk detected".to_string(),
                    (true, false) => format!(
                        "Negative momentum: {}% over 24h",
                        metrics.price_change_24h.normalize()
                    ),
                    _ => format!("High risk score {}", risk_score.normalize()),
                }
            }
            SignalKind::Hold => "No threshold crossed".to_string(),
        }
    }
}

fn unit(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

/// `numerator / cap` clamped to [0, 1]; an overflowing quotient saturates
fn unit_ratio(numerator: Decimal, cap: Decimal) -> Decimal {
    if numerator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(cap).map_or(Decimal::ONE, unit)
}
