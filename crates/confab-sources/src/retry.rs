//! Bounded retry for upstream page requests.
//!
//! Retries transient failures only:
//! - timeouts and connection errors
//! - 5xx server errors, 408, 429
//!
//! It does NOT retry 4xx client errors. The terminal response (or error) is
//! returned as-is; callers decide what a non-success status means.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 2000;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry (doubles each attempt)
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with custom settings
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Delay before the retry following `attempt` (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

/// Execute an HTTP request with bounded retries.
///
/// Runs `operation` up to `max_retries + 1` times, sleeping an exponentially
/// growing (capped) delay between attempts. The final attempt's outcome is
/// returned unchanged.
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    for attempt in 0..config.max_retries {
        match operation().await {
            Ok(response) if is_retryable_status(response.status()) => {
                tracing::warn!(
                    status = %response.status(),
                    attempt,
                    "Transient upstream status; retrying"
                );
            }
            Ok(response) => return Ok(response),
            Err(error) if is_retryable_error(&error) => {
                tracing::warn!(error = %error, attempt, "Transient request error; retrying");
            }
            Err(error) => return Err(error),
        }

        tokio::time::sleep(config.delay_for_attempt(attempt)).await;
    }

    // Final attempt; whatever happens now is terminal.
    operation().await
}
