//! Per-token monitoring scheduler
//!
//! Each monitored token owns a timer task. Ticks run an analysis cycle only
//! while the global run flag is set. Cycles started by a caller
//! ([`TokenMonitor::analyze_token`]) return their errors; cycles started by a
//! timer log them and keep the timer alive.

use super::{MonitorEvent, MonitorSettings, SignalHistory};
use crate::signal::{
    ConfidenceWeights, SignalError, SignalGenerator, SignalThresholds, ThresholdOverride,
    TradingSignal,
};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use crate::tracker::{TokenAnalysis, TokenDataSource, TrackerError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Errors from registering a monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The initial analysis failed, nothing was registered
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    /// Timers need a positive period
    #[error("Monitoring interval must be greater than zero")]
    ZeroInterval,
}

/// Registry entry for one running timer
struct MonitorHandle {
    stop: watch::Sender<bool>,
    interval: Duration,
}

impl MonitorHandle {
    /// Ask the timer to exit; an in-flight cycle finishes first
    fn cancel(&self) {
        self.stop.send_replace(true);
    }
}

/// State shared between the monitor and its timer tasks
struct Shared<S> {
    source: S,
    running: AtomicBool,
    generator: RwLock<SignalGenerator>,
    registry: Mutex<HashMap<String, MonitorHandle>>,
    history: RwLock<HashMap<String, SignalHistory>>,
    events: broadcast::Sender<MonitorEvent>,
    history_limit: usize,
}

impl<S> Shared<S> {
    fn registry(&self) -> MutexGuard<'_, HashMap<String, MonitorHandle>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: MonitorEvent) {
        let name = event.name();
        if self.events.send(event).is_err() {
            tracing::trace!(event = name, "No event subscribers");
        }
    }
}

impl<S: TokenDataSource> Shared<S> {
    /// Fetch, evaluate, and record one token
    async fn run_cycle(
        &self,
        address: &str,
    ) -> Result<(TokenAnalysis, TradingSignal), TrackerError> {
        let analysis = self.source.analyze(address).await?;
        let signal = self.generator.read().await.evaluate(&analysis, address);

        tracing::debug!(
            token = %address,
            kind = %signal.kind,
            confidence = signal.confidence,
            "Signal evaluated"
        );

        if signal.kind.is_actionable() {
            self.record(signal.clone()).await;
        }

        Ok((analysis, signal))
    }

    async fn record(&self, signal: TradingSignal) {
        {
            let mut history = self.history.write().await;
            history
                .entry(signal.token_address.clone())
                .or_insert_with(|| SignalHistory::new(self.history_limit))
                .push(signal.clone());
        }

        telemetry::increment_counter(
            CounterMetric::SignalsEmitted,
            Some(("kind", signal.kind.as_str())),
        );
        tracing::info!(
            token = %signal.token_address,
            kind = %signal.kind,
            confidence = signal.confidence,
            reason = %signal.reason,
            "Trading signal"
        );

        if let Some(event) = MonitorEvent::from_signal(signal) {
            self.publish(event);
        }
    }

    /// Timer path: failures are logged and swallowed
    async fn scheduled_cycle(&self, address: &str) {
        if let Err(e) = self.run_cycle(address).await {
            telemetry::increment_counter(CounterMetric::CycleFailures, None);
            if e.is_rate_limited() {
                tracing::info!(
                    token = %address,
                    error = %e,
                    "Scheduled analysis throttled, retrying on next tick"
                );
            } else {
                tracing::warn!(
                    token = %address,
                    error = %e,
                    "Scheduled analysis failed, retrying on next tick"
                );
            }
        }
    }
}

/// Keeps a set of tokens under periodic evaluation
///
/// One instance per process; share it behind an `Arc` when several callers
/// need it.
pub struct TokenMonitor<S> {
    shared: Arc<Shared<S>>,
    default_interval: Duration,
}

impl<S: TokenDataSource + 'static> TokenMonitor<S> {
    /// Create a stopped monitor
    pub fn new(source: S, generator: SignalGenerator, settings: MonitorSettings) -> Self {
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));

        Self {
            shared: Arc::new(Shared {
                source,
                running: AtomicBool::new(false),
                generator: RwLock::new(generator),
                registry: Mutex::new(HashMap::new()),
                history: RwLock::new(HashMap::new()),
                events,
                history_limit: settings.history_limit,
            }),
            default_interval: settings.default_interval,
        }
    }

    /// Create a monitor with default thresholds and settings
    pub fn with_defaults(source: S) -> Self {
        Self::new(source, SignalGenerator::default(), MonitorSettings::default())
    }

    /// Receive lifecycle and signal events
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.shared.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Set the run flag so timers start evaluating
    pub fn start(&self) {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            tracing::info!("Token monitor is already running");
            return;
        }

        tracing::info!("Token monitor started");
        self.shared.publish(MonitorEvent::Started);
    }

    /// Clear the run flag and cancel every timer
    pub fn stop(&self) {
        let was_running = self.shared.running.swap(false, Ordering::SeqCst);
        let cancelled = self.cancel_all();

        if !was_running {
            tracing::info!(cancelled, "Token monitor is not running");
            return;
        }

        tracing::info!(cancelled, "Token monitor stopped");
        self.shared.publish(MonitorEvent::Stopped);
    }

    /// Analyze a token now; errors are returned to the caller
    pub async fn analyze_token(&self, address: &str) -> Result<TokenAnalysis, TrackerError> {
        self.evaluate_token(address).await.map(|(analysis, _)| analysis)
    }

    /// Analyze a token now and also return the signal it produced
    pub async fn evaluate_token(
        &self,
        address: &str,
    ) -> Result<(TokenAnalysis, TradingSignal), TrackerError> {
        let address = address.trim();
        tracing::info!(token = %address, "Analyzing token");

        self.shared.run_cycle(address).await.map_err(|e| {
            tracing::error!(token = %address, error = %e, "Token analysis failed");
            e
        })
    }

    /// Begin periodic monitoring of a token
    ///
    /// No-op if the token is already monitored. Otherwise runs one analysis
    /// immediately (its error is returned and nothing is registered), then
    /// arms a timer firing every `interval`, or the configured default.
    pub async fn start_monitoring(
        &self,
        address: &str,
        interval: Option<Duration>,
    ) -> Result<(), MonitorError> {
        let address = address.trim();
        let period = interval.unwrap_or(self.default_interval);
        if period.is_zero() {
            return Err(MonitorError::ZeroInterval);
        }

        if self.is_monitoring(address) {
            tracing::info!(token = %address, "Already monitoring token");
            return Ok(());
        }

        self.evaluate_token(address).await?;

        let active = {
            let mut registry = self.shared.registry();
            match registry.entry(address.to_string()) {
                Entry::Occupied(_) => {
                    tracing::debug!(token = %address, "Timer armed concurrently, keeping existing");
                    return Ok(());
                }
                Entry::Vacant(slot) => {
                    let (stop_tx, stop_rx) = watch::channel(false);
                    tokio::spawn(run_timer(
                        Arc::clone(&self.shared),
                        address.to_string(),
                        period,
                        stop_rx,
                    ));
                    slot.insert(MonitorHandle {
                        stop: stop_tx,
                        interval: period,
                    });
                }
            }
            registry.len()
        };

        telemetry::set_gauge(GaugeMetric::ActiveMonitors, active as f64);
        tracing::info!(
            token = %address,
            interval_ms = period.as_millis() as u64,
            "Started monitoring token"
        );
        Ok(())
    }

    /// Stop monitoring one token; returns whether it was monitored
    pub fn stop_monitoring_token(&self, address: &str) -> bool {
        let address = address.trim();
        let (removed, active) = {
            let mut registry = self.shared.registry();
            let removed = registry.remove(address);
            (removed, registry.len())
        };

        match removed {
            Some(handle) => {
                handle.cancel();
                telemetry::set_gauge(GaugeMetric::ActiveMonitors, active as f64);
                tracing::info!(token = %address, "Stopped monitoring token");
                true
            }
            None => false,
        }
    }

    pub fn is_monitoring(&self, address: &str) -> bool {
        self.shared.registry().contains_key(address.trim())
    }

    /// Monitored addresses, sorted
    pub fn monitored_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.shared.registry().keys().cloned().collect();
        tokens.sort();
        tokens
    }

    /// Period of a token's timer
    pub fn monitoring_interval(&self, address: &str) -> Option<Duration> {
        self.shared
            .registry()
            .get(address.trim())
            .map(|handle| handle.interval)
    }

    /// Recorded BUY/SELL signals for a token, oldest first
    pub async fn signal_history(&self, address: &str) -> Vec<TradingSignal> {
        self.shared
            .history
            .read()
            .await
            .get(address.trim())
            .map(SignalHistory::to_vec)
            .unwrap_or_default()
    }

    /// Most recent BUY/SELL signal for a token
    pub async fn latest_signal(&self, address: &str) -> Option<TradingSignal> {
        self.shared
            .history
            .read()
            .await
            .get(address.trim())
            .and_then(SignalHistory::latest)
            .cloned()
    }

    /// Current decision thresholds
    pub async fn thresholds(&self) -> SignalThresholds {
        self.shared.generator.read().await.thresholds().clone()
    }

    /// Override some thresholds for all future decisions
    ///
    /// Running timers keep their interval; only the decisions change.
    pub async fn set_signal_thresholds(
        &self,
        overrides: ThresholdOverride,
    ) -> Result<SignalThresholds, SignalError> {
        let mut generator = self.shared.generator.write().await;
        generator.apply_override(&overrides)?;
        let updated = generator.thresholds().clone();

        tracing::info!(
            price_change_pct = %updated.price_change_pct,
            liquidity_floor = %updated.liquidity_floor,
            risk_ceiling = %updated.risk_ceiling,
            "Signal thresholds updated"
        );
        Ok(updated)
    }

    /// Replace the confidence weights for all future decisions
    pub async fn set_confidence_weights(
        &self,
        weights: ConfidenceWeights,
    ) -> Result<(), SignalError> {
        self.shared.generator.write().await.set_weights(weights)
    }
}

impl<S> TokenMonitor<S> {
    /// Cancel every timer and empty the registry
    fn cancel_all(&self) -> usize {
        let drained: Vec<(String, MonitorHandle)> = self.shared.registry().drain().collect();
        for (address, handle) in &drained {
            handle.cancel();
            tracing::debug!(token = %address, "Cancelled monitor timer");
        }
        if !drained.is_empty() {
            telemetry::set_gauge(GaugeMetric::ActiveMonitors, 0.0);
        }
        drained.len()
    }
}

impl<S> Drop for TokenMonitor<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Timer loop for one token
async fn run_timer<S: TokenDataSource>(
    shared: Arc<Shared<S>>,
    address: String,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = ticker.tick() => {}
        }

        if !shared.running.load(Ordering::SeqCst) {
            tracing::trace!(token = %address, "Monitor not running, skipping tick");
            continue;
        }

        shared.scheduled_cycle(&address).await;

        if *stop.borrow() {
            break;
        }
    }

    tracing::debug!(token = %address, "Monitor timer exited");
}
