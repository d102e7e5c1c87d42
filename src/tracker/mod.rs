//! Token data module
//!
//! Pulls token metadata, market metrics and risk scores from Solana Tracker

mod address;
mod client;
mod error;
mod policy;
mod types;

pub use address::validate_address;
pub use client::{ClientConfig, Endpoint, SolanaTrackerClient, SOLANA_TRACKER_API_URL};
pub use error::TrackerError;
pub use policy::{Attempt, RequestPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_SPACING};
pub use types::{
    QuoteValue, RiskReport, TokenAnalysis, TokenAth, TokenExtensions, TokenHolder, TokenHolders,
    TokenInfo, TokenMetrics,
};

use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can produce a [`TokenAnalysis`] for a mint address
#[async_trait]
pub trait TokenDataSource: Send + Sync {
    /// Fetch a fresh analysis; no caching
    async fn analyze(&self, address: &str) -> Result<TokenAnalysis, TrackerError>;
}

#[async_trait]
impl<T: TokenDataSource + ?Sized> TokenDataSource for Arc<T> {
    async fn analyze(&self, address: &str) -> Result<TokenAnalysis, TrackerError> {
        (**self).analyze(address).await
    }
}
