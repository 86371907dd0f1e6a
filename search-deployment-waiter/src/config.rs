//! Retry timing configuration and the backoff strategy derived from it

use crate::error::{WaitError, WaitResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default overall wait for search node provisioning
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3 * 60 * 60);
/// Default floor between two status requests
pub const DEFAULT_MIN_RETRY_INTERVAL: Duration = Duration::from_secs(60);
/// Default ceiling for exponential growth of the retry interval
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Timing knobs for one wait call.
///
/// Constructed once per call and read-only for its duration. `delay`, when set,
/// replaces the exponential schedule with a fixed pause between attempts, which
/// keeps tests deterministic (`Some(Duration::ZERO)` polls back to back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total wall-clock budget for the wait
    pub timeout: Duration,
    /// Floor for the interval between attempts
    pub min_retry_interval: Duration,
    /// Ceiling for exponential growth; never lower than the floor
    pub max_retry_interval: Duration,
    /// Fixed inter-attempt delay overriding the exponential schedule
    pub delay: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            min_retry_interval: DEFAULT_MIN_RETRY_INTERVAL,
            max_retry_interval: DEFAULT_MAX_RETRY_INTERVAL,
            delay: None,
        }
    }
}

impl RetryConfig {
    /// Create a validated config with the default ceiling and no fixed delay
    pub fn new(timeout: Duration, min_retry_interval: Duration) -> WaitResult<Self> {
        let config = Self {
            timeout,
            min_retry_interval,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the exponential schedule with a fixed delay between attempts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_max_retry_interval(mut self, max_retry_interval: Duration) -> Self {
        self.max_retry_interval = max_retry_interval;
        self
    }

    /// Check the invariants: a positive floor, and a timeout no shorter than the floor.
    pub fn validate(&self) -> WaitResult<()> {
        if self.min_retry_interval.is_zero() {
            return Err(WaitError::invalid_config(
                "minimum retry interval must be greater than zero",
            ));
        }
        if self.timeout < self.min_retry_interval {
            return Err(WaitError::invalid_config(format!(
                "timeout {:?} is shorter than the minimum retry interval {:?}",
                self.timeout, self.min_retry_interval
            )));
        }
        Ok(())
    }

    /// Backoff strategy for one wait call
    pub fn backoff(&self) -> Backoff {
        match self.delay {
            Some(delay) => Backoff::Fixed(delay),
            None => Backoff::exponential(self.min_retry_interval, self.max_retry_interval),
        }
    }
}

/// Inter-attempt delay strategy.
///
/// Every delay handed out is clamped to the time left before the deadline, so the
/// last sleep never overshoots it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Doubling delay starting at `floor`, capped at `ceiling`
    Exponential {
        next: Duration,
        floor: Duration,
        ceiling: Duration,
    },
    /// Same delay before every attempt
    Fixed(Duration),
}

impl Backoff {
    pub fn exponential(floor: Duration, ceiling: Duration) -> Self {
        Self::Exponential {
            next: floor,
            floor,
            ceiling: ceiling.max(floor),
        }
    }

    /// Delay before the next attempt, given the time remaining until the deadline
    pub fn next_delay(&mut self, remaining: Duration) -> Duration {
        let delay = match self {
            Self::Fixed(delay) => *delay,
            Self::Exponential {
                next,
                floor,
                ceiling,
            } => {
                let current = *next;
                *next = next.saturating_mul(2).min(*ceiling).max(*floor);
                current
            }
        };
        delay.min(remaining)
    }
}
