//! Solana Tracker API client
//!
//! Fetches token metadata, market metrics, risk, holders and all-time highs
//! from the Solana Tracker data API. Every request goes through the shared
//! [`RequestPolicy`] so the client never exceeds the provider's rate limit.

use super::policy::{Attempt, RequestPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_SPACING};
use super::types::{AthResponse, MetricsResponse, RiskResponse, TokenInfoResponse, TrendingEntry};
use super::{
    validate_address, RiskReport, TokenAnalysis, TokenAth, TokenDataSource, TokenHolders,
    TokenInfo, TokenMetrics, TrackerError,
};
use crate::config::TrackerConfig;
use crate::telemetry::{self, CounterMetric, LatencyMetric};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Solana Tracker data API base URL
pub const SOLANA_TRACKER_API_URL: &str = "https://data.solanatracker.io";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-api-key";

/// Configuration for the tracker client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the data API
    pub base_url: String,
    /// API key sent as `x-api-key`
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Minimum gap between requests
    pub request_spacing: Duration,
    /// Attempts per request when throttled
    pub max_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: SOLANA_TRACKER_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
            request_spacing: DEFAULT_REQUEST_SPACING,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl From<&TrackerConfig> for ClientConfig {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            request_spacing: Duration::from_millis(config.request_spacing_ms),
            max_attempts: config.max_attempts,
        }
    }
}

/// Provider endpoints, used for routing and as metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Info,
    Metrics,
    Risk,
    Holders,
    Ath,
    Trending,
}

impl Endpoint {
    /// Request path relative to the base URL
    pub fn path(&self, address: &str) -> String {
        match self {
            Endpoint::Info => format!("/tokens/{address}"),
            Endpoint::Metrics => format!("/tokens/{address}/metrics"),
            Endpoint::Risk => format!("/tokens/{address}/risk"),
            Endpoint::Holders => format!("/tokens/{address}/holders"),
            Endpoint::Ath => format!("/tokens/{address}/ath"),
            Endpoint::Trending => "/tokens/trending".to_string(),
        }
    }

    /// Short name for logs, metrics and errors
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Info => "info",
            Endpoint::Metrics => "metrics",
            Endpoint::Risk => "risk",
            Endpoint::Holders => "holders",
            Endpoint::Ath => "ath",
            Endpoint::Trending => "trending",
        }
    }
}

/// Client for the Solana Tracker data API
pub struct SolanaTrackerClient {
    config: ClientConfig,
    client: Client,
    policy: RequestPolicy,
}

impl SolanaTrackerClient {
    /// Create a client with default configuration and no API key
    pub fn new() -> Result<Self, TrackerError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, TrackerError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| TrackerError::Transport {
                endpoint: "client",
                source,
            })?;

        let policy = RequestPolicy::new(config.request_spacing, config.max_attempts);

        if config.api_key.is_none() {
            tracing::warn!("No Solana Tracker API key configured");
        }

        Ok(Self {
            config,
            client,
            policy,
        })
    }

    /// Spacing and retry policy shared by every request
    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    /// Fetch info, metrics and risk concurrently and combine them
    pub async fn analyze(&self, address: &str) -> Result<TokenAnalysis, TrackerError> {
        let address = validate_address(address)?;

        tracing::debug!(token = %address, "Fetching token analysis");

        let (token, metrics, risk) = tokio::try_join!(
            self.fetch_info(address),
            self.fetch_metrics(address),
            self.fetch_risk(address),
        )?;

        Ok(TokenAnalysis::new(token, metrics, risk))
    }

    /// Fetch token metadata
    pub async fn token_info(&self, address: &str) -> Result<TokenInfo, TrackerError> {
        self.fetch_info(validate_address(address)?).await
    }

    /// Fetch current market metrics
    pub async fn token_metrics(&self, address: &str) -> Result<TokenMetrics, TrackerError> {
        self.fetch_metrics(validate_address(address)?).await
    }

    /// Fetch the provider risk report
    pub async fn token_risk(&self, address: &str) -> Result<RiskReport, TrackerError> {
        self.fetch_risk(validate_address(address)?).await
    }

    /// Fetch the holder distribution
    pub async fn token_holders(&self, address: &str) -> Result<TokenHolders, TrackerError> {
        let address = validate_address(address)?;
        self.get(Endpoint::Holders, address).await
    }

    /// Fetch the all-time high price
    pub async fn token_ath(&self, address: &str) -> Result<TokenAth, TrackerError> {
        let address = validate_address(address)?;
        let raw: AthResponse = self.get(Endpoint::Ath, address).await?;
        Ok(raw.into())
    }

    /// Fetch currently trending tokens
    pub async fn trending(&self) -> Result<Vec<TokenInfo>, TrackerError> {
        let entries: Vec<TrendingEntry> = self.get(Endpoint::Trending, "").await?;
        Ok(entries.into_iter().map(TokenInfo::from).collect())
    }

    async fn fetch_info(&self, address: &str) -> Result<TokenInfo, TrackerError> {
        let raw: TokenInfoResponse = self.get(Endpoint::Info, address).await?;
        Ok(raw.token)
    }

    async fn fetch_metrics(&self, address: &str) -> Result<TokenMetrics, TrackerError> {
        let raw: MetricsResponse = self.get(Endpoint::Metrics, address).await?;
        Ok(raw.into())
    }

    async fn fetch_risk(&self, address: &str) -> Result<RiskReport, TrackerError> {
        let raw: RiskResponse = self.get(Endpoint::Risk, address).await?;
        Ok(raw.into())
    }

    /// GET an endpoint under the request policy and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        address: &str,
    ) -> Result<T, TrackerError> {
        let url = self.url(endpoint, address);
        let url = url.as_str();

        let body = self
            .policy
            .execute(endpoint.label(), move || self.send_once(endpoint, url))
            .await?;

        serde_json::from_str(&body).map_err(|source| TrackerError::Decode {
            endpoint: endpoint.label(),
            source,
        })
    }

    /// Dispatch one request; 429 is reported back to the policy, not as an error
    async fn send_once(
        &self,
        endpoint: Endpoint,
        url: &str,
    ) -> Result<Attempt<String>, TrackerError> {
        tracing::debug!(url = %url, endpoint = endpoint.label(), "Requesting Solana Tracker");

        let mut request = self.client.get(url);
        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let started = std::time::Instant::now();
        let response = request
            .send()
            .await
            .map_err(|source| TrackerError::Transport {
                endpoint: endpoint.label(),
                source,
            })?;

        telemetry::record_latency(LatencyMetric::TrackerRequest, started.elapsed());
        telemetry::increment_counter(
            CounterMetric::TrackerRequests,
            Some(("endpoint", endpoint.label())),
        );

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Http {
                endpoint: endpoint.label(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| TrackerError::Transport {
                endpoint: endpoint.label(),
                source,
            })?;

        Ok(Attempt::Done(body))
    }

    fn url(&self, endpoint: Endpoint, address: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path(address)
        )
    }
}

#[async_trait]
impl TokenDataSource for SolanaTrackerClient {
    async fn analyze(&self, address: &str) -> Result<TokenAnalysis, TrackerError> {
        SolanaTrackerClient::analyze(self, address).await
    }
}
