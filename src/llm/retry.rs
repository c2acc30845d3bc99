//! Retry policy shared by every model attempt.

use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

use crate::error::ModelError;

/// Cap on a single backoff interval.
const MAX_BACKOFF_SECS: u64 = 30;

/// How one model is retried and when the orchestrator moves on.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts per model, including the first one.
    pub attempts_per_model: u32,
    /// Delay before the second attempt; doubles after that.
    pub backoff_base: Duration,
    pub max_backoff: Duration,
    /// Upper bound of the uniform random delay added to every backoff.
    pub jitter: Duration,
    /// Pause before the next model after a non-overload failure.
    pub switch_delay: Duration,
    /// Errors that skip the switch delay.
    pub is_overload: fn(&ModelError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts_per_model: 1,
            backoff_base: Duration::from_secs(1),
            max_backoff: Duration::from_secs(MAX_BACKOFF_SECS),
            jitter: Duration::from_secs(1),
            switch_delay: Duration::from_secs(2),
            is_overload: is_overloaded,
        }
    }
}

impl RetryPolicy {
    pub fn schedule(&self) -> RetrySchedule {
        RetrySchedule::new(self)
    }

    /// Attempts per model, never less than one.
    pub fn max_attempts(&self) -> u32 {
        self.attempts_per_model.max(1)
    }
}

/// Provider overload: HTTP 503, or a message saying so.
pub fn is_overloaded(err: &ModelError) -> bool {
    err.status() == Some(503) || err.to_string().to_lowercase().contains("overloaded")
}

/// Delays between consecutive attempts on one model.
///
/// The n-th delay is `base * 2^(n-1)` (capped at `max_backoff`) plus a
/// uniform random value in `[0, jitter]`.
pub struct RetrySchedule {
    exponential: ExponentialBackoff,
    jitter: ExponentialBackoff,
}

impl RetrySchedule {
    pub fn new(policy: &RetryPolicy) -> Self {
        let exponential = ExponentialBackoff {
            current_interval: policy.backoff_base,
            initial_interval: policy.backoff_base,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: policy.max_backoff,
            max_elapsed_time: None,
            ..Default::default()
        };

        // Centered on jitter/2 with factor 1.0, so draws span [0, jitter].
        let half = policy.jitter / 2;
        let jitter = ExponentialBackoff {
            current_interval: half,
            initial_interval: half,
            randomization_factor: 1.0,
            multiplier: 1.0,
            max_interval: half,
            max_elapsed_time: None,
            ..Default::default()
        };

        Self {
            exponential,
            jitter,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let base = self.exponential.next_backoff().unwrap_or(self.exponential.max_interval);
        let jitter = if self.jitter.initial_interval.is_zero() {
            Duration::ZERO
        } else {
            self.jitter.next_backoff().unwrap_or_default()
        };
        base + jitter
    }
}
