//! token-signals: BUY/SELL/HOLD signals for Solana tokens
//!
//! This library provides the core components for:
//! - Token metadata, metrics and risk from the Solana Tracker data API
//! - Process-wide request spacing with retry on rate limiting
//! - Deterministic signal generation with a weighted confidence score
//! - Per-token monitoring timers with typed events and bounded history
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod monitor;
pub mod signal;
pub mod telemetry;
pub mod tracker;
