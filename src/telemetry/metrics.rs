//! Prometheus metrics

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Solana Tracker round trip, excluding spacing waits
    TrackerRequest,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Requests sent to Solana Tracker
    TrackerRequests,
    /// 429 responses received
    RateLimited,
    /// BUY/SELL signals recorded
    SignalsEmitted,
    /// Scheduled cycles that failed
    CycleFailures,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Tokens with an armed timer
    ActiveMonitors,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::TrackerRequest => "token_signals_tracker_request_latency_ms",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::TrackerRequests => "token_signals_tracker_requests_total",
            CounterMetric::RateLimited => "token_signals_rate_limited_total",
            CounterMetric::SignalsEmitted => "token_signals_signals_total",
            CounterMetric::CycleFailures => "token_signals_cycle_failures_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::ActiveMonitors => "token_signals_active_monitors",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = metric.name();
    histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
    tracing::trace!(
        metric = metric_name,
        value_ms = duration.as_millis() as u64,
        "Recording latency"
    );
}

/// Increment a counter, optionally with one label
pub fn increment_counter(metric: CounterMetric, label: Option<(&'static str, &'static str)>) {
    let metric_name = metric.name();
    match label {
        Some((key, value)) => counter!(metric_name, key => value).increment(1),
        None => counter!(metric_name).increment(1),
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = metric.name();
    gauge!(metric_name).set(value);
    tracing::trace!(metric = metric_name, value = value, "Setting gauge");
}

/// Serve Prometheus metrics on `0.0.0.0:port`
///
/// Must be called from within a tokio runtime.
pub fn init_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
