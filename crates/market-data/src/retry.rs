//! Bounded retry with exponential backoff and jitter.
//!
//! The delay before a retry is `jitter + base_delay * 2^attempt`, capped at
//! `max_delay`, where jitter is drawn uniformly from `[0, max_jitter]`. The
//! loop keeps a `remaining` budget that counts down from `max_retries`, and
//! `attempt` is that budget: the first retry waits the longest and later
//! retries wait less.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// Retry configuration shared by the provider client and the dashboard client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Base delay doubled on every attempt.
    pub base_delay: Duration,
    /// Upper bound of the random jitter added to each delay.
    pub max_jitter: Duration,
    /// Hard cap on a single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(750),
            max_jitter: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    /// Policy used by the dashboard client: 2 retries on a 300 ms base.
    pub fn client_default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(300),
            ..Self::default()
        }
    }

    /// Policy without any sleeping, mostly useful in tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Deterministic part of the delay: `base_delay * 2^attempt`, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Full delay for the given attempt, jitter included.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        };
        (self.backoff(attempt) + jitter).min(self.max_delay)
    }

    /// Runs `op` until it succeeds, fails with an error `should_retry` rejects,
    /// or the retry budget is spent. The last error is returned.
    pub async fn run<T, E, F, Fut, P>(&self, label: &str, mut op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut remaining = self.max_retries;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if remaining > 0 && should_retry(&err) => {
                    let attempt = remaining;
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{} failed ({}); retrying in {:?} ({} retries left)",
                        label,
                        err,
                        delay,
                        remaining - 1
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    remaining -= 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
