//! Bounded exponential-backoff retry for transient provider failures.

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::warn;

/// Retry policy: at most `max_attempts` calls, waiting
/// `initial_delay * 2^i` before retry `i` (no jitter).
///
/// Which errors count as transient is the caller's choice via the predicate
/// passed to [`RetryPolicy::run`]; everything else propagates immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Run `operation`, retrying failures for which `should_retry` holds
    /// while attempts remain. The last observed error propagates when the
    /// budget is exhausted; a non-retryable error propagates unchanged after
    /// a single attempt.
    pub async fn run<T, F, Fut, C>(&self, mut operation: F, mut should_retry: C) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        C: FnMut(&Error) -> bool,
    {
        // base 2 with factor initial/2 yields initial, 2*initial, 4*initial...
        let mut delays = ExponentialBackoff::from_millis(2)
            .factor(self.initial_delay.as_millis() as u64 / 2)
            .take(self.max_attempts.saturating_sub(1));
        let mut attempt = 1usize;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if should_retry(&err) => match delays.next() {
                    Some(delay) => {
                        warn!(
                            "Transient failure on attempt {}/{}: {}. Retrying in {:?}",
                            attempt, self.max_attempts, err, delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            }
        }
    }
}
