//! Retry policy configuration for delivery.

use std::time::Duration;

/// Configuration for linear back-off retry behavior.
///
/// After failed attempt `n` the engine waits `n * step` before trying
/// again. No jitter is applied; the only bound is `max_attempts`.
///
/// # Defaults
///
/// - `max_attempts`: 10
/// - `step`: 1 second
///
/// # Example
///
/// ```
/// use oms_shipper::ingest::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_after(3), Duration::from_secs(3));
///
/// let custom = RetryPolicy::new()
///     .with_max_attempts(5)
///     .with_step(Duration::from_millis(200));
/// assert_eq!(custom.delay_after(2), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    ///
    /// A value of 1 means no retries; only the initial attempt is made.
    pub max_attempts: u32,

    /// Delay added per failed attempt.
    pub step: Duration,
}

impl RetryPolicy {
    /// Default maximum attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    /// Default back-off step (1 second).
    pub const DEFAULT_STEP: Duration = Duration::from_secs(1);

    /// Minimum value for `max_attempts`.
    pub const MIN_MAX_ATTEMPTS: u32 = 1;

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            step: Self::DEFAULT_STEP,
        }
    }

    /// Sets the maximum number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is less than 1.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(
            max_attempts >= Self::MIN_MAX_ATTEMPTS,
            "max_attempts must be at least 1"
        );
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the back-off step.
    ///
    /// Zero is allowed and produces a tight retry loop.
    #[must_use]
    pub const fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Returns the delay to wait after failed attempt `attempt` (1-indexed).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt)
    }

    /// Returns true if another attempt may follow attempt `attempt`.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
