//! Retry policy with exponential backoff
//!
//! - Max attempts: 3 (first try included)
//! - Delay before attempt n+1: min(2s * 2^(n-1), 10s), i.e. 2s, 4s, 8s, 10s...
//! - Exhaustion returns the last error untouched

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::config::ResilienceSettings;

/// Total attempts including the first one
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay after the first failure (2 seconds)
const MIN_DELAY_MS: u64 = 2000;

/// Maximum delay cap (10 seconds)
const MAX_DELAY_MS: u64 = 10000;

/// Retry policy with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first
    max_attempts: u32,

    /// Delay after the first failure in milliseconds
    min_delay_ms: u64,

    /// Maximum delay cap in milliseconds
    max_delay_ms: u64,

    /// Enable ±25% jitter
    enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy {
    /// Create policy with default settings (3 attempts, 2s..10s)
    pub fn new() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            min_delay_ms: MIN_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            enable_jitter: false,
        }
    }

    /// Create policy with custom attempts and initial delay
    pub fn with_config(max_attempts: u32, min_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_delay_ms,
            max_delay_ms: MAX_DELAY_MS.max(min_delay_ms),
            enable_jitter: false,
        }
    }

    /// Create policy from loaded settings
    pub fn from_settings(settings: &ResilienceSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            min_delay_ms: settings.min_delay_ms,
            max_delay_ms: settings.max_delay_ms.max(settings.min_delay_ms),
            enable_jitter: settings.jitter,
        }
    }

    /// Execute operation, retrying on any error
    ///
    /// The error of the final attempt is returned as-is.
    pub async fn execute_with_retry<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt >= self.max_attempts {
                        warn!(attempt, error = %e, "giving up after final attempt");
                        return Err(e);
                    }

                    let delay = self.calculate_delay(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// Delay to wait after the given (1-based) failed attempt
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let exponential_delay = self.min_delay_ms.saturating_mul(2u64.pow(exponent));

        let delay_ms = exponential_delay.min(self.max_delay_ms);

        let final_delay = if self.enable_jitter {
            let jitter = (delay_ms / 4) as i64;
            let random_jitter = (rand::random::<f64>() * 2.0 - 1.0) * jitter as f64;
            ((delay_ms as i64) + random_jitter as i64).max(0) as u64
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay)
    }

    /// Upper bound of time spent sleeping before giving up
    pub fn max_total_wait_time(&self) -> Duration {
        let total_ms = (1..self.max_attempts)
            .map(|attempt| {
                let exponent = (attempt - 1).min(31);
                self.min_delay_ms
                    .saturating_mul(2u64.pow(exponent))
                    .min(self.max_delay_ms)
            })
            .sum();

        Duration::from_millis(total_ms)
    }

    /// Get max attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
