//! Request spacing and 429 retry policy
//!
//! The data provider throttles aggressively, so every outbound request goes
//! through one shared watermark: a request may not be dispatched until
//! `spacing` has passed since the previous dispatch. The watermark is stamped
//! before the network call so overlapping callers never share a window.

use super::TrackerError;
use crate::telemetry::{self, CounterMetric};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, sleep_until, Instant};

/// Default gap between consecutive requests
pub const DEFAULT_REQUEST_SPACING: Duration = Duration::from_millis(2000);

/// Default attempt budget for a throttled request, first try included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Outcome of a single dispatch
#[derive(Debug)]
pub enum Attempt<T> {
    /// Request completed
    Done(T),
    /// Provider answered 429
    RateLimited,
}

/// Process-wide spacing watermark plus bounded retry on 429
#[derive(Debug)]
pub struct RequestPolicy {
    spacing: Duration,
    max_attempts: u32,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPolicy {
    /// Create a policy; `max_attempts` is at least one
    pub fn new(spacing: Duration, max_attempts: u32) -> Self {
        Self {
            spacing,
            max_attempts: max_attempts.max(1),
            last_request: Mutex::new(None),
        }
    }

    /// Minimum gap between dispatches
    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Total attempts allowed per request
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retrying a throttled request
    pub fn backoff(&self) -> Duration {
        self.spacing * 2
    }

    /// Wait until the watermark allows another dispatch, then claim it
    ///
    /// The lock is held across the wait so concurrent callers queue up and
    /// each gets its own window.
    pub async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.spacing;
            if ready_at > Instant::now() {
                tracing::trace!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "Waiting for request slot"
                );
                sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Run `send` under the policy
    ///
    /// Each attempt waits for its slot first. A 429 sleeps for
    /// [`backoff`](Self::backoff) and tries again until the budget is spent;
    /// any error returned by `send` is passed straight through.
    pub async fn execute<T, F, Fut>(
        &self,
        endpoint: &'static str,
        mut send: F,
    ) -> Result<T, TrackerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Attempt<T>, TrackerError>>,
    {
        let mut attempt = 1;
        loop {
            self.wait_turn().await;

            match send().await? {
                Attempt::Done(value) => return Ok(value),
                Attempt::RateLimited => {
                    telemetry::increment_counter(
                        CounterMetric::RateLimited,
                        Some(("endpoint", endpoint)),
                    );

                    if attempt >= self.max_attempts {
                        tracing::warn!(
                            endpoint,
                            attempts = attempt,
                            "Rate limit retries exhausted"
                        );
                        return Err(TrackerError::RateLimited {
                            endpoint,
                            attempts: attempt,
                        });
                    }

                    let backoff = self.backoff();
                    tracing::info!(
                        endpoint,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "Rate limited, backing off before retry"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_SPACING, DEFAULT_MAX_ATTEMPTS)
    }
}
