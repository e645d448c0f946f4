//! Retry loop with randomized exponential backoff.

use log::warn;
use std::future::Future;
use std::time::Duration;

use crate::error::{Result, SearchError};
use crate::runtime::Runtime;

/// Maximum number of attempts for a single search request.
pub const MAX_RETRIES: usize = 20;

/// Upper bound on the delay between two attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(600);

/// Range, in seconds, the first delay is drawn from.
pub const INITIAL_JITTER_SECS: (f64, f64) = (1.0, 10.0);

/// How many times to try a request and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub max_backoff: Duration,
    pub initial_jitter_secs: (f64, f64),
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            max_backoff: MAX_BACKOFF,
            initial_jitter_secs: INITIAL_JITTER_SECS,
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.max_backoff, self.initial_jitter_secs)
    }
}

/// Backoff state for one request. Never shared between calls.
///
/// Starting from zero, every failure doubles the previous delay, capped at
/// `max_backoff`. A zero result (the first failure) is replaced by a random
/// delay from the jitter range.
#[derive(Debug, Clone)]
pub struct Backoff {
    current_secs: f64,
    max_secs: f64,
    jitter: (f64, f64),
}

impl Backoff {
    pub fn new(max_backoff: Duration, jitter: (f64, f64)) -> Self {
        Self {
            current_secs: 0.0,
            max_secs: max_backoff.as_secs_f64(),
            jitter,
        }
    }

    /// Advances the state and returns the delay to wait before the next attempt.
    pub fn next_delay<R: Runtime + ?Sized>(&mut self, runtime: &R) -> Duration {
        let doubled = (self.current_secs * 2.0).min(self.max_secs);
        self.current_secs = if doubled > 0.0 {
            doubled
        } else {
            runtime.uniform_secs(self.jitter.0, self.jitter.1)
        };
        Duration::from_secs_f64(self.current_secs.max(0.0))
    }

    pub fn current(&self) -> Duration {
        Duration::from_secs_f64(self.current_secs.max(0.0))
    }
}

/// Executes an async operation, retrying transient failures.
///
/// Sleeps only between attempts: a success returns immediately, and so does
/// the last failed attempt. Non-transient errors are returned as-is.
pub async fn with_retry<R, F, Fut, T>(
    runtime: &R,
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
) -> Result<T>
where
    R: Runtime + ?Sized,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = policy.backoff();
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => {
                if attempt < policy.max_attempts {
                    let delay = backoff.next_delay(runtime);
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {:.1}s...",
                        operation_name,
                        attempt,
                        policy.max_attempts,
                        e,
                        delay.as_secs_f64()
                    );
                    runtime.sleep(delay).await;
                } else {
                    warn!(
                        "{}: attempt {}/{} failed ({}), giving up",
                        operation_name, attempt, policy.max_attempts, e
                    );
                }
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(SearchError::RetriesExhausted {
            attempts: policy.max_attempts,
            last_error: Box::new(e),
        }),
        None => Err(SearchError::Configuration(format!(
            "{}: retry policy allows no attempts",
            operation_name
        ))),
    }
}
