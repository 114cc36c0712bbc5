//! Retry policy: decides whether and when a failed query is retried.

use std::time::Duration;

/// バックオフの上限
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Retry policy for failed queries.
///
/// `max_retries == 0` means a failed request is reported as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Base delay for the first retry.
    pub base_delay: Duration,

    /// Backoff multiplier for exponential backoff.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// 失敗しても再試行しない（bootstrap の既定値）
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }

    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::disabled()
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.max_retries == 0
    }

    /// `attempts` 回失敗した後に、もう一度試すかどうか
    pub fn should_retry(&self, attempts: u32) -> bool {
        attempts <= self.max_retries
    }

    /// Delay before the next retry: `base_delay * multiplier^(attempts - 1)`,
    /// capped at [`MAX_RETRY_DELAY`].
    ///
    /// A negative or non-finite multiplier is treated as `1.0` (constant delay).
    ///
    /// # Arguments
    /// * `attempts` - Number of attempts already made (1-indexed).
    pub fn next_delay(&self, attempts: u32) -> Duration {
        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 0.0 {
            self.multiplier
        } else {
            1.0
        };
        let exponent = i32::try_from(attempts.saturating_sub(1)).unwrap_or(i32::MAX);
        let delay_secs = self.base_delay.as_secs_f64() * multiplier.powi(exponent);
        Duration::try_from_secs_f64(delay_secs)
            .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}
