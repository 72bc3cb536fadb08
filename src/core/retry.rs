//! Bounded retry policy for rate-limited remote calls

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::core::errors::Result;

/// Delay strategy between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    Fixed(Duration),
    /// Base delay doubled after each attempt
    Exponential(Duration),
}

impl Backoff {
    /// Delay to wait after the given attempt (1-based)
    fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential(base) => *base * 2_u32.saturating_pow(attempt - 1),
        }
    }
}

/// Bounded retry policy: a total attempt ceiling plus a backoff strategy.
///
/// Only rate-limit-classified errors are retried; any other failure is
/// returned immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Fixed delay between attempts
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Exponentially growing delay between attempts
    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Exponential(base),
        }
    }

    /// Total attempt ceiling
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run the operation until it succeeds, fails with a non-retryable
    /// error, or exhausts the attempt ceiling.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("succeeded on attempt {}/{}", attempt, self.max_attempts);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_rate_limit() => {
                    if attempt < self.max_attempts {
                        let delay = self.backoff.delay(attempt);
                        warn!(
                            "rate limited, waiting {:?} before attempt {}/{}",
                            delay,
                            attempt + 1,
                            self.max_attempts
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // max_attempts >= 1 and only the rate-limit arm falls through,
        // so last_error is always set here
        Err(last_error.unwrap())
    }
}
