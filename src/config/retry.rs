//! Retry policy for population lookups.
//!
//! Only transient failures (the remote indicator service timing out or
//! refusing connections) are retried. A country/year the service does not
//! know is a definitive answer and is never retried.
//!
//! ```toml
//! [population.retry]
//! enabled = true
//! max_retries = 3
//! base_delay_ms = 200
//! strategy = "exponential"
//! ```

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Retries after the first attempt (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (default: 200)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Upper bound for a single delay in milliseconds (default: 5000)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            strategy: RetryStrategy::default(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Delay before retry `attempt` (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay_ms as f64;
        let delay_ms = match self.strategy {
            RetryStrategy::Constant => base_ms,
            RetryStrategy::Linear => base_ms * f64::from(attempt),
            RetryStrategy::Exponential => base_ms * 2.0_f64.powi(attempt as i32 - 1),
            RetryStrategy::Fibonacci => base_ms * fibonacci(attempt) as f64,
        };
        Duration::from_millis(delay_ms.min(self.max_delay_ms as f64) as u64)
    }

    /// Whether another attempt is allowed after `attempt` retries.
    pub fn should_retry(&self, attempt: u32) -> bool {
        self.enabled && attempt < self.max_retries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    Constant,
    Linear,
    #[default]
    Exponential,
    Fibonacci,
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5_000
}

fn fibonacci(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

/// Run `op` until it succeeds, fails with a non-retryable error, runs out of
/// retries or would sleep past `deadline`.
pub fn retry_until<T, E>(
    config: &RetryConfig,
    deadline: Option<Instant>,
    is_retryable: impl Fn(&E) -> bool,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if is_retryable(&err) && config.should_retry(attempt) => {
                attempt += 1;
                let delay = config.delay_for_attempt(attempt);
                let wakes_past = |d: Instant| {
                    Instant::now()
                        .checked_add(delay)
                        .map_or(true, |wake| wake >= d)
                };
                if deadline.is_some_and(wakes_past) {
                    return Err(err);
                }
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying");
                std::thread::sleep(delay);
            }
            Err(err) => return Err(err),
        }
    }
}
