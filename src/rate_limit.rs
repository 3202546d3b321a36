/*!
 * Request pacing and throttle-triggered retries.
 *
 * `RateLimiter` spaces consecutive requests by a minimum interval, waiting only
 * for the part of the interval that has not already elapsed. `RetryPolicy`
 * decides how long to back off after the server signals throttling.
 */

use std::future::Future;
use std::time::Duration;
use log::warn;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::app_config::RateLimitConfig;
use crate::errors::ProviderError;

/// Enforces a minimum interval between requests
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until a request may be sent, then record it
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Exponential backoff applied only to throttling failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self { max_retries, backoff_base_ms }
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(1u64 << exponent))
    }

    /// Backoff for `error`, preferring a server-provided `Retry-After`
    pub fn delay_for_error(&self, attempt: u32, error: &ProviderError) -> Duration {
        match error {
            ProviderError::RateLimitExceeded { retry_after_secs: Some(secs), .. } => {
                Duration::from_secs(*secs)
            }
            _ => self.delay_for(attempt),
        }
    }

    /// Run `operation`, retrying while it fails with a throttling error
    pub async fn run<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_throttling() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for_error(attempt, &e);
                    warn!(
                        "{} failed ({}), retrying in {:.1}s - attempt {}/{}",
                        what,
                        e,
                        delay.as_secs_f64(),
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl From<&RateLimitConfig> for RetryPolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self::new(config.max_retries, config.retry_backoff_ms)
    }
}

impl From<&RateLimitConfig> for RateLimiter {
    fn from(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_millis(config.request_delay_ms))
    }
}
