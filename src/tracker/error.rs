//! Data provider errors

use thiserror::Error;

/// Errors surfaced by the Solana Tracker client
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Address is empty or not a base58 encoded 32-byte key
    #[error("Invalid token address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
    /// Provider kept answering 429 until the attempt budget ran out
    #[error("Rate limited on {endpoint} after {attempts} attempts")]
    RateLimited {
        endpoint: &'static str,
        attempts: u32,
    },
    /// Non-success status other than 429
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Http {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    /// Connection, TLS, or timeout failure
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// Body was not the JSON shape we expect
    #[error("Malformed {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl TrackerError {
    /// Whether the error came from the provider throttling us
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, TrackerError::RateLimited { .. })
    }
}
