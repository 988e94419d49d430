//! Multiplicative retry delay: grows on every failed batch, resets on success.

use std::time::Duration;

use tibera_core::config::defaults;

/// Smallest retry delay. A zero base would never grow.
const MIN_BASE: Duration = Duration::from_millis(1);

/// Shape of the retry delay curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    base: Duration,
    factor: f64,
    max: Duration,
}

impl BackoffPolicy {
    /// `base` is at least one millisecond. `factor` below 1.0 (or not finite)
    /// is treated as 1.0 so the delay never shrinks between failures, and
    /// `max` is raised to `base` if smaller.
    pub fn new(base: Duration, factor: f64, max: Duration) -> Self {
        let base = base.max(MIN_BASE);
        let factor = if factor.is_finite() && factor >= 1.0 {
            factor
        } else {
            1.0
        };
        Self {
            base,
            factor,
            max: max.max(base),
        }
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(defaults::DEFAULT_BACKOFF_BASE_MS),
            defaults::DEFAULT_BACKOFF_FACTOR,
            Duration::from_millis(defaults::DEFAULT_BACKOFF_MAX_MS),
        )
    }
}

/// Current retry delay under a [`BackoffPolicy`]. Whole milliseconds only.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Duration,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            current: policy.base,
        }
    }

    /// Delay that the next retry would use.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Grow the delay after a failure and return the new value.
    pub fn on_failure(&mut self) -> Duration {
        let current_ms = self.current.as_millis() as f64;
        let mut next_ms = (current_ms * self.policy.factor).round();
        if self.policy.factor > 1.0 && next_ms <= current_ms {
            // Rounding would stall small delays.
            next_ms = current_ms + 1.0;
        }
        let max_ms = self.policy.max.as_millis() as f64;
        self.current = Duration::from_millis(next_ms.min(max_ms) as u64);
        self.current
    }

    /// Back to the base delay.
    pub fn reset(&mut self) {
        self.current = self.policy.base;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}
