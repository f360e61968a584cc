/*!
 * Bounded retries with exponential backoff.
 *
 * `retry_with_backoff` runs any fallible async operation up to
 * `max_attempts` times, sleeping `base_delay * 2^i` after failed attempt `i`
 * when another attempt remains.
 */

use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::app_config::TranslationCommonConfig;

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failure; doubles after each further failure
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; zero attempts is treated as one
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Policy that tries once and never sleeps
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Build from the `translation.common` config section
    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self::new(common.max_attempts, Duration::from_millis(common.retry_backoff_ms))
    }

    /// Sleep after the failed attempt with 0-based index `attempt`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Sum of all sleeps when every attempt fails
    pub fn worst_case_delay(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| self.delay_after(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&TranslationCommonConfig::default())
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// The closure receives the 0-based attempt index. The error of the last
/// attempt is returned when all attempts fail.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let remaining = policy.max_attempts.saturating_sub(attempt + 1);
                if remaining == 0 {
                    return Err(e);
                }

                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} failed: {} - retrying in {:?}",
                    attempt + 1,
                    policy.max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
