//! Monitor command implementation

use crate::config::Config;
use crate::monitor::{MonitorEvent, MonitorSettings, TokenMonitor};
use clap::Args;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Token mint addresses; defaults to `monitor.tokens` from config
    pub addresses: Vec<String>,

    /// Interval between analyses in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

impl MonitorArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let tokens = if self.addresses.is_empty() {
            config.monitor.tokens.clone()
        } else {
            self.addresses.clone()
        };
        if tokens.is_empty() {
            anyhow::bail!("No tokens to monitor; pass addresses or set monitor.tokens");
        }

        let client = super::tracker_client(config)?;
        let generator = config.signal.generator()?;
        let monitor = TokenMonitor::new(client, generator, MonitorSettings::from(&config.monitor));
        let interval = self.interval_ms.map(Duration::from_millis);

        let mut events = monitor.subscribe();
        monitor.start();

        for token in &tokens {
            if let Err(e) = monitor.start_monitoring(token, interval).await {
                tracing::error!(token = %token, error = %e, "Could not start monitoring");
            }
        }

        if monitor.monitored_tokens().is_empty() {
            monitor.stop();
            anyhow::bail!("No token could be monitored");
        }

        tracing::info!(tokens = ?monitor.monitored_tokens(), "Monitoring, press Ctrl-C to stop");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) => report(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        for token in monitor.monitored_tokens() {
            match monitor.latest_signal(&token).await {
                Some(signal) => println!(
                    "{token}: last {} ({}%) at {}",
                    signal.kind,
                    signal.confidence,
                    signal.timestamp.format("%Y-%m-%d %H:%M:%S")
                ),
                None => println!("{token}: no BUY/SELL signal"),
            }
        }

        monitor.stop();
        Ok(())
    }
}

fn report(event: &MonitorEvent) {
    match event.signal() {
        Some(signal) => println!(
            "[{}] {} {} ({}%): {}",
            signal.timestamp.format("%Y-%m-%d %H:%M:%S"),
            signal.kind,
            signal.token_address,
            signal.confidence,
            signal.reason
        ),
        None => tracing::debug!(event = event.name(), "Monitor event"),
    }
}
