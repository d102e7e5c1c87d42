//! Integration tests for the token monitor against a fake data source

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use token_signals::monitor::{MonitorEvent, MonitorSettings, TokenMonitor};
use token_signals::signal::{SignalGenerator, SignalKind, ThresholdOverride};
use token_signals::tracker::{
    TokenAnalysis, TokenDataSource, TokenInfo, TokenMetrics, TrackerError,
};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::sleep;
use tokio_test::{assert_err, assert_ok};

const BULL: &str = "So11111111111111111111111111111111111111112";
const BEAR: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const FLAT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

fn analysis(price_change: Decimal, liquidity: Decimal, risk: Decimal) -> TokenAnalysis {
    TokenAnalysis {
        token: TokenInfo::default(),
        metrics: TokenMetrics {
            current_price: dec!(1),
            market_cap: dec!(1000000),
            liquidity,
            volume_24h: dec!(50000),
            price_change_24h: price_change,
        },
        risk_score: risk,
        risk_factors: vec![],
    }
}

/// Returns a fixed analysis per address; unknown addresses fail
struct MarketFixture {
    tokens: HashMap<&'static str, TokenAnalysis>,
    calls: AtomicUsize,
}

impl MarketFixture {
    fn new() -> Arc<Self> {
        let mut tokens = HashMap::new();
        tokens.insert(BULL, analysis(dec!(10), dec!(600000), dec!(3)));
        tokens.insert(BEAR, analysis(dec!(-8), dec!(100000), dec!(2)));
        tokens.insert(FLAT, analysis(dec!(1), dec!(10000), dec!(1)));
        Arc::new(Self {
            tokens,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TokenDataSource for MarketFixture {
    async fn analyze(&self, address: &str) -> Result<TokenAnalysis, TrackerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(address)
            .cloned()
            .ok_or_else(|| TrackerError::Http {
                endpoint: "info",
                status: 404,
                body: "unknown token".to_string(),
            })
    }
}

fn monitor(source: &Arc<MarketFixture>) -> TokenMonitor<Arc<MarketFixture>> {
    TokenMonitor::new(
        Arc::clone(source),
        SignalGenerator::default(),
        MonitorSettings {
            default_interval: Duration::from_secs(60),
            ..MonitorSettings::default()
        },
    )
}

#[tokio::test(start_paused = true)]
async fn test_full_session() {
    let source = MarketFixture::new();
    let monitor = monitor(&source);
    let mut events = monitor.subscribe();

    monitor.start();
    for token in [BULL, BEAR, FLAT] {
        assert_ok!(monitor.start_monitoring(token, None).await);
    }
    assert_eq!(monitor.monitored_tokens().len(), 3);
    assert_eq!(
        monitor.monitoring_interval(FLAT),
        Some(Duration::from_secs(60))
    );

    // Initial cycles plus two scheduled rounds
    sleep(Duration::from_secs(150)).await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 9);

    monitor.stop();
    assert!(monitor.monitored_tokens().is_empty());

    let mut received = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => received.push(event),
            Err(TryRecvError::Empty) => break,
            Err(e) => panic!("unexpected receive error {e:?}"),
        }
    }

    assert_eq!(received.first(), Some(&MonitorEvent::Started));
    assert_eq!(received.last(), Some(&MonitorEvent::Stopped));
    let buys = received.iter().filter(|e| e.name() == "buySignal").count();
    let sells = received.iter().filter(|e| e.name() == "sellSignal").count();
    assert_eq!(buys, 3);
    assert_eq!(sells, 3);

    assert_eq!(monitor.signal_history(BULL).await.len(), 3);
    assert_eq!(monitor.signal_history(BEAR).await.len(), 3);
    assert!(monitor.signal_history(FLAT).await.is_empty());

    let bull = monitor.signal_history(BULL).await;
    assert!(bull
        .iter()
        .all(|s| s.kind == SignalKind::Buy && s.confidence == 59));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_token_is_not_registered() {
    let source = MarketFixture::new();
    let monitor = monitor(&source);

    let result = monitor
        .start_monitoring("11111111111111111111111111111111", None)
        .await;

    assert_err!(result);
    assert!(monitor.monitored_tokens().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_threshold_change_flips_decision() {
    let source = MarketFixture::new();
    let monitor = monitor(&source);
    monitor.start();

    let (_, signal) = monitor.evaluate_token(FLAT).await.unwrap();
    assert_eq!(signal.kind, SignalKind::Hold);

    monitor
        .set_signal_thresholds(ThresholdOverride {
            price_change_pct: Some(dec!(0.5)),
            liquidity_floor: Some(dec!(5000)),
            ..Default::default()
        })
        .await
        .unwrap();

    let (_, signal) = monitor.evaluate_token(FLAT).await.unwrap();
    assert_eq!(signal.kind, SignalKind::Buy);
    assert_eq!(monitor.signal_history(FLAT).await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop() {
    let source = MarketFixture::new();
    let monitor = monitor(&source);

    monitor.start();
    monitor.start_monitoring(BULL, None).await.unwrap();
    monitor.stop();
    assert!(!monitor.is_monitoring(BULL));

    monitor.start();
    monitor.start_monitoring(BULL, None).await.unwrap();
    sleep(Duration::from_secs(61)).await;

    assert!(monitor.is_monitoring(BULL));
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}
