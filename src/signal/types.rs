//! Signal types

use crate::tracker::TokenMetrics;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trading decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl SignalKind {
    /// Whether the signal asks for action
    pub fn is_actionable(&self) -> bool {
        !matches!(self, SignalKind::Hold)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
            SignalKind::Hold => "HOLD",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trading signal for one token at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    /// Unique signal identifier
    pub id: Uuid,
    /// Decision
    #[serde(rename = "type")]
    pub kind: SignalKind,
    /// 0-100, zero for HOLD
    pub confidence: u8,
    /// Human-readable explanation
    pub reason: String,
    /// Metrics the decision was made on
    pub metrics: TokenMetrics,
    /// Provider risk score at decision time
    pub risk_score: Decimal,
    /// Signal generation timestamp
    pub timestamp: DateTime<Utc>,
    /// Mint the signal is about
    pub token_address: String,
}
