//! Integration tests for configuration loading

use rust_decimal_macros::dec;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use token_signals::config::{Config, ConfigError};
use token_signals::monitor::MonitorSettings;
use token_signals::telemetry::LogFormat;
use token_signals::tracker::ClientConfig;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_example_config() {
    let file = write_config(include_str!("../../config.toml.example"));
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.tracker.max_attempts, 3);
    assert_eq!(config.signal.risk_ceiling, dec!(7));
    assert_eq!(config.signal.weights.price_change, dec!(0.4));
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
}

#[test]
fn test_load_builds_component_settings() {
    let file = write_config(
        r#"
        [tracker]
        base_url = "http://localhost:8080"
        request_spacing_ms = 250
        max_attempts = 4
        timeout_secs = 2

        [monitor]
        interval_ms = 1500
        history_limit = 20

        [telemetry]
        log_level = "debug"
        log_format = "json"
        "#,
    );
    let config = Config::load(file.path()).unwrap();

    let client = ClientConfig::from(&config.tracker);
    assert_eq!(client.base_url, "http://localhost:8080");
    assert_eq!(client.request_spacing, Duration::from_millis(250));
    assert_eq!(client.max_attempts, 4);

    let settings = MonitorSettings::from(&config.monitor);
    assert_eq!(settings.history_limit, 20);

    assert_eq!(config.telemetry.log_format, LogFormat::Json);
    assert!(config.signal.generator().is_ok());
}

#[test]
fn test_load_rejects_invalid_values() {
    let file = write_config("[tracker]\nmax_attempts = 0\n");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_load_rejects_malformed_toml() {
    let file = write_config("[tracker\nbase_url = ");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
