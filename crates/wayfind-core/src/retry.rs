//! Bounded retry with exponential backoff.
//!
//! [`with_retry`] wraps a fallible async operation and re-runs it up to
//! `max_retries` extra times, sleeping `initial_delay * backoff_factor^i`
//! seconds after failed attempt `i`. The last error is re-raised
//! unchanged; wrapping and classification belong to the call boundary,
//! not to this controller.
//!
//! Known simplification, carried over deliberately: the controller does
//! not distinguish retryable from non-retryable errors. Every failure is
//! retried under the same policy, and exhaustion always surfaces the
//! exact error of the final attempt.

use std::future::Future;
use std::time::Duration;

/// Retry parameters, snapshotted from the planning configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Sleep after the first failed attempt, in seconds.
    pub initial_delay_secs: f64,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Backoff delay after failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let secs = self.initial_delay_secs * self.backoff_factor.powi(attempt as i32);
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// Run `operation` under `policy`, returning its first success or the
/// error from the final attempt.
///
/// `what` names the operation in retry warnings. The backoff sleep
/// suspends the calling task; there is no jitter and no parallelism.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    operation = what,
                    attempt = attempt + 1,
                    delay_secs = delay.as_secs_f64(),
                    error = %error,
                    "attempt failed; backing off before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                tracing::error!(
                    operation = what,
                    attempts = attempt + 1,
                    error = %error,
                    "all attempts exhausted"
                );
                return Err(error);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
