//! Token data types and Solana Tracker wire formats

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Token metadata from `/tokens/{address}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub mint: String,
    pub uri: Option<String>,
    pub decimals: u8,
    pub image: Option<String>,
    pub description: Option<String>,
    pub has_file_meta_data: bool,
    pub extensions: Option<TokenExtensions>,
    pub tags: Vec<String>,
}

/// Social links attached to token metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenExtensions {
    pub twitter: Option<String>,
    pub telegram: Option<String>,
}

/// Market snapshot for a token, USD denominated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetrics {
    pub current_price: Decimal,
    pub market_cap: Decimal,
    pub liquidity: Decimal,
    #[serde(rename = "volume24h")]
    pub volume_24h: Decimal,
    /// Signed percentage
    #[serde(rename = "priceChange24h")]
    pub price_change_24h: Decimal,
}

/// Provider risk assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// 0 (safest) to 10
    pub score: Decimal,
    pub factors: Vec<String>,
    pub rugged: bool,
}

/// Everything the signal generator needs about one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAnalysis {
    pub token: TokenInfo,
    pub metrics: TokenMetrics,
    pub risk_score: Decimal,
    pub risk_factors: Vec<String>,
}

impl TokenAnalysis {
    /// Combine the three lookups into one analysis
    pub fn new(token: TokenInfo, metrics: TokenMetrics, risk: RiskReport) -> Self {
        Self {
            token,
            metrics,
            risk_score: risk.score,
            risk_factors: risk.factors,
        }
    }
}

/// Quote and USD value pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteValue {
    pub quote: Decimal,
    pub usd: Decimal,
}

/// A single holder account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenHolder {
    pub wallet: String,
    pub amount: Decimal,
    pub value: QuoteValue,
    pub percentage: Decimal,
}

/// Holder distribution from `/tokens/{address}/holders`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenHolders {
    pub total: u64,
    pub accounts: Vec<TokenHolder>,
}

/// All-time high from `/tokens/{address}/ath`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenAth {
    pub price: Decimal,
    /// Milliseconds since epoch, 0 when unknown
    pub timestamp: i64,
}

impl TokenAth {
    /// Time the all-time high was reached
    pub fn reached_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp <= 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// `{ "token": {...}, "pools": [...], ... }`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenInfoResponse {
    pub token: TokenInfo,
}

/// Raw metrics payload; absent fields count as zero
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct MetricsResponse {
    price: Option<UsdAmount>,
    market_cap: Option<UsdAmount>,
    liquidity: Option<UsdAmount>,
    #[serde(rename = "volume24h")]
    volume_24h: Option<Decimal>,
    #[serde(rename = "priceChange24h")]
    price_change_24h: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UsdAmount {
    usd: Option<Decimal>,
}

impl UsdAmount {
    fn usd_or_zero(amount: Option<UsdAmount>) -> Decimal {
        amount.and_then(|a| a.usd).unwrap_or_default()
    }
}

impl From<MetricsResponse> for TokenMetrics {
    fn from(raw: MetricsResponse) -> Self {
        Self {
            current_price: UsdAmount::usd_or_zero(raw.price),
            market_cap: UsdAmount::usd_or_zero(raw.market_cap),
            liquidity: UsdAmount::usd_or_zero(raw.liquidity),
            volume_24h: raw.volume_24h.unwrap_or_default(),
            price_change_24h: raw.price_change_24h.unwrap_or_default(),
        }
    }
}

/// Raw risk payload
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RiskResponse {
    score: Option<Decimal>,
    risks: Vec<RiskEntry>,
    rugged: bool,
}

/// Risks arrive either as bare labels or as detailed objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RiskEntry {
    Label(String),
    Detailed {
        name: String,
        #[allow(dead_code)]
        #[serde(default)]
        description: Option<String>,
        #[allow(dead_code)]
        #[serde(default)]
        level: Option<String>,
    },
}

impl From<RiskResponse> for RiskReport {
    fn from(raw: RiskResponse) -> Self {
        let factors = raw
            .risks
            .into_iter()
            .map(|entry| match entry {
                RiskEntry::Label(label) => label,
                RiskEntry::Detailed { name, .. } => name,
            })
            .collect();

        Self {
            score: raw.score.unwrap_or_default(),
            factors,
            rugged: raw.rugged,
        }
    }
}

/// Raw ATH payload
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AthResponse {
    highest_price: Option<Decimal>,
    timestamp: Option<i64>,
}

impl From<AthResponse> for TokenAth {
    fn from(raw: AthResponse) -> Self {
        Self {
            price: raw.highest_price.unwrap_or_default(),
            timestamp: raw.timestamp.unwrap_or_default(),
        }
    }
}

/// Trending entries are either wrapped (`{"token": {...}}`) or bare token info
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TrendingEntry {
    Wrapped { token: TokenInfo },
    Bare(TokenInfo),
}

impl From<TrendingEntry> for TokenInfo {
    fn from(entry: TrendingEntry) -> Self {
        match entry {
            TrendingEntry::Wrapped { token } => token,
            TrendingEntry::Bare(token) => token,
        }
    }
}
