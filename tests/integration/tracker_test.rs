//! Integration tests for the Solana Tracker client against a local HTTP stub

use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use token_signals::tracker::{ClientConfig, SolanaTrackerClient, TokenDataSource, TrackerError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const MINT: &str = "So11111111111111111111111111111111111111112";
const SPACING: Duration = Duration::from_millis(50);

const INFO: &str = r#"{"token":{"name":"Wrapped SOL","symbol":"SOL","mint":"So11111111111111111111111111111111111111112","decimals":9}}"#;
const METRICS: &str = r#"{"price":{"usd":0.05},"marketCap":{"usd":2000000},"liquidity":{"usd":600000},"volume24h":100000,"priceChange24h":10}"#;
const RISK: &str = r#"{"score":3,"risks":["Low liquidity",{"name":"Mutable metadata","level":"warning"}],"rugged":false}"#;

#[derive(Debug, Clone)]
struct Hit {
    path: String,
    api_key: Option<String>,
}

type Handler = Arc<dyn Fn(&str, usize) -> (u16, String) + Send + Sync>;

/// Minimal HTTP/1.1 server answering one request per connection
struct Stub {
    base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl Stub {
    async fn spawn(handler: impl Fn(&str, usize) -> (u16, String) + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let recorded = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let hits = Arc::clone(&recorded);

                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&buf).to_string();
                    let path = request
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or("/")
                        .to_string();
                    let api_key = request.lines().find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("x-api-key")
                            .then(|| value.trim().to_string())
                    });

                    let index = {
                        let mut hits = hits.lock().unwrap();
                        hits.push(Hit {
                            path: path.clone(),
                            api_key,
                        });
                        hits.len() - 1
                    };

                    let (status, body) = handler(&path, index);
                    let reason = match status {
                        200 => "OK",
                        429 => "Too Many Requests",
                        404 => "Not Found",
                        _ => "Internal Server Error",
                    };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    fn client(&self) -> SolanaTrackerClient {
        SolanaTrackerClient::with_config(ClientConfig {
            base_url: self.base_url.clone(),
            api_key: Some("test-key".to_string()),
            timeout: Duration::from_secs(5),
            request_spacing: SPACING,
            max_attempts: 3,
        })
        .unwrap()
    }
}

fn route(path: &str) -> (u16, String) {
    if path.ends_with("/metrics") {
        (200, METRICS.to_string())
    } else if path.ends_with("/risk") {
        (200, RISK.to_string())
    } else {
        (200, INFO.to_string())
    }
}

#[tokio::test]
async fn test_analyze_joins_three_lookups() {
    let stub = Stub::spawn(|path, _| route(path)).await;
    let client = stub.client();

    let started = Instant::now();
    let analysis = client.analyze(MINT).await.unwrap();

    assert_eq!(analysis.token.symbol, "SOL");
    assert_eq!(analysis.metrics.liquidity, dec!(600000));
    assert_eq!(analysis.metrics.price_change_24h, dec!(10));
    assert_eq!(analysis.risk_score, dec!(3));
    assert_eq!(
        analysis.risk_factors,
        vec!["Low liquidity".to_string(), "Mutable metadata".to_string()]
    );

    let hits = stub.hits();
    assert_eq!(hits.len(), 3);
    assert!(hits
        .iter()
        .all(|hit| hit.api_key.as_deref() == Some("test-key")));
    let mut paths: Vec<&str> = hits.iter().map(|hit| hit.path.as_str()).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            format!("/tokens/{MINT}"),
            format!("/tokens/{MINT}/metrics"),
            format!("/tokens/{MINT}/risk"),
        ]
    );

    // Three requests through one watermark leave at least two gaps
    assert!(started.elapsed() >= SPACING * 2);
}

#[tokio::test]
async fn test_trait_object_analysis() {
    let stub = Stub::spawn(|path, _| route(path)).await;
    let source: Arc<dyn TokenDataSource> = Arc::new(stub.client());

    let analysis = source.analyze(MINT).await.unwrap();
    assert_eq!(analysis.metrics.current_price, dec!(0.05));
}

#[tokio::test]
async fn test_rate_limited_then_success() {
    let stub = Stub::spawn(|_, index| {
        if index == 0 {
            (429, r#"{"error":"slow down"}"#.to_string())
        } else {
            (200, METRICS.to_string())
        }
    })
    .await;
    let client = stub.client();

    let started = Instant::now();
    let metrics = client.token_metrics(MINT).await.unwrap();

    assert_eq!(metrics.market_cap, dec!(2000000));
    assert_eq!(stub.hits().len(), 2);
    assert!(started.elapsed() >= client.policy().backoff());
}

#[tokio::test]
async fn test_rate_limit_exhaustion() {
    let stub = Stub::spawn(|_, _| (429, String::new())).await;
    let client = stub.client();

    let err = client.token_risk(MINT).await.unwrap_err();

    assert!(matches!(
        err,
        TrackerError::RateLimited {
            endpoint: "risk",
            attempts: 3
        }
    ));
    assert_eq!(stub.hits().len(), 3);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let stub = Stub::spawn(|_, _| (500, "boom".to_string())).await;
    let client = stub.client();

    let err = client.token_info(MINT).await.unwrap_err();

    match err {
        TrackerError::Http { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(stub.hits().len(), 1);
}

#[tokio::test]
async fn test_any_failed_lookup_fails_analysis() {
    let stub = Stub::spawn(|path, _| {
        if path.ends_with("/risk") {
            (404, "{}".to_string())
        } else {
            route(path)
        }
    })
    .await;
    let client = stub.client();

    let err = client.analyze(MINT).await.unwrap_err();
    assert!(matches!(err, TrackerError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let stub = Stub::spawn(|_, _| (200, r#"{"price": "#.to_string())).await;
    let client = stub.client();

    let err = client.token_metrics(MINT).await.unwrap_err();
    assert!(matches!(err, TrackerError::Decode { .. }));
}

#[tokio::test]
async fn test_invalid_address_sends_nothing() {
    let stub = Stub::spawn(|path, _| route(path)).await;
    let client = stub.client();

    let err = client.analyze("not-a-mint").await.unwrap_err();

    assert!(matches!(err, TrackerError::InvalidAddress { .. }));
    assert!(stub.hits().is_empty());
}

#[tokio::test]
async fn test_auxiliary_endpoints() {
    let stub = Stub::spawn(|path, _| {
        if path.ends_with("/holders") {
            (
                200,
                r#"{"total":2,"accounts":[{"wallet":"w1","amount":100,"value":{"quote":1,"usd":150},"percentage":60},{"wallet":"w2","amount":50,"value":{"quote":0.5,"usd":75},"percentage":40}]}"#.to_string(),
            )
        } else if path.ends_with("/ath") {
            (200, r#"{"highest_price":1.25,"timestamp":1700000000000}"#.to_string())
        } else {
            (
                200,
                format!(r#"[{{"token":{{"symbol":"SOL","mint":"{MINT}"}}}},{{"symbol":"BONK"}}]"#),
            )
        }
    })
    .await;
    let client = stub.client();

    let holders = client.token_holders(MINT).await.unwrap();
    assert_eq!(holders.total, 2);
    assert_eq!(holders.accounts[0].value.usd, dec!(150));

    let ath = client.token_ath(MINT).await.unwrap();
    assert_eq!(ath.price, dec!(1.25));
    assert!(ath.reached_at().is_some());

    let trending = client.trending().await.unwrap();
    let symbols: Vec<&str> = trending.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["SOL", "BONK"]);

    let paths: Vec<String> = stub.hits().into_iter().map(|hit| hit.path).collect();
    assert_eq!(paths.last().map(String::as_str), Some("/tokens/trending"));
}
