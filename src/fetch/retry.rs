//! Bounded exponential backoff for fetches

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::FetchError;

/// Retry settings: 3 attempts, 1s base delay doubling per retry, capped at 30s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Same attempt count, no sleeping
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based): base, 2*base, 4*base, ...
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails non-retryably, or attempts run out.
    ///
    /// The last retryable error is returned when every attempt failed.
    pub fn run<T, F>(&self, what: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Result<T, FetchError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        what,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient failure, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::fetch::{non_retryable, retryable};

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(10), Duration::from_secs(30));
        assert_eq!(RetryPolicy::immediate().delay_for(3), Duration::ZERO);
    }

    #[test]
    fn test_retries_transient_failures_until_success() {
        let mut calls = 0;
        let result = RetryPolicy::immediate().run("test", || {
            calls += 1;
            if calls < 3 {
                Err(retryable("o/r", "HTTP 503"))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::immediate().run("test", || {
            calls += 1;
            Err(retryable("o/r", "HTTP 429"))
        });
        assert!(result.unwrap_err().is_retryable());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_non_retryable_fails_immediately() {
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::immediate().run("test", || {
            calls += 1;
            Err(non_retryable("o/r", "HTTP 404"))
        });
        assert!(!result.unwrap_err().is_retryable());
        assert_eq!(calls, 1);
    }
}
