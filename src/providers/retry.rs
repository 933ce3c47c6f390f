//! Retry configuration and the shared backoff loop.
//!
//! Every client that retries (the Ollama client, the chat proxy call, the
//! Replicate prediction sequence) delegates to the `with_retry()` helper,
//! keeping retry logic in a single place.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::{MAX_RETRIES, RETRY_BASE};
use crate::telemetry;
use crate::{MuninnError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff: the retry after attempt `n` (0-indexed) waits
/// `base_delay * 2^n`. Defaults match the shared policy: 10 retries after
/// the initial request, 5s base delay.
///
/// ```rust
/// # use muninn::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_retries(3)
///     .base_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial request. 0 = single attempt.
    pub max_retries: u32,
    /// Base delay; doubled for each subsequent retry.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: RETRY_BASE,
        }
    }
}

impl RetryConfig {
    /// Create a new config with the shared defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the number of retries after the initial request.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the base backoff delay.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Calculate the delay before the retry following attempt `attempt`
    /// (0-indexed): `base_delay * 2^attempt`, saturating.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Calculate the effective delay, respecting provider `Retry-After`
    /// hints from a rate-limit response.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Execute an async operation with retry logic.
///
/// Transient errors (as classified by [`MuninnError::is_transient()`]) are
/// retried after an exponential backoff sleep, up to `config.max_retries`
/// retries; the ceiling surfaces as `RetriesExhausted` carrying the last
/// underlying error. Permanent errors are returned immediately.
///
/// The backoff sleep yields to the runtime; dropping the returned future
/// cancels both the in-flight request and any pending sleep.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    provider_name: &str,
    operation: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt >= config.max_retries {
                    return Err(MuninnError::RetriesExhausted {
                        attempts: attempt + 1,
                        last: Box::new(e),
                    });
                }
                metrics::counter!(telemetry::RETRIES_TOTAL,
                    "provider" => provider_name.to_owned(),
                    "operation" => operation.to_owned(),
                )
                .increment(1);
                let delay = config.effective_delay(attempt, e.retry_after());
                warn!(
                    provider = provider_name,
                    operation,
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
}
