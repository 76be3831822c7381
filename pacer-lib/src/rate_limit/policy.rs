//! Backoff schedule for retried operations.

use std::time::Duration;

use rand::Rng;

/// Backoff schedule for retried operations.
///
/// The default schedule doubles a one second delay after every failed
/// attempt (1s, 2s, 4s, ...) with no ceiling and no jitter, so the timing
/// of a run is fully determined by how many attempts it makes.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pacer_lib::rate_limit::RetryPolicy;
///
/// // Default: up to 3 retries, 1s/2s/4s between attempts
/// let policy = RetryPolicy::default();
///
/// // Custom: 5 retries, delays capped at 30s, up to 500ms of jitter
/// let custom = RetryPolicy::default()
///     .max_retries(5)
///     .max_backoff(Duration::from_secs(30))
///     .max_jitter(Duration::from_millis(500));
///
/// // Single attempt, no retries
/// let once = RetryPolicy::no_retry();
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    /// Delay before the first retry (doubles each attempt).
    pub initial_backoff: Duration,
    /// Ceiling on the computed delay, if any.
    pub max_backoff: Option<Duration>,
    /// Upper bound on random extra delay added to each backoff.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: None,
            max_jitter: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given retry budget and default backoff.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Creates a policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the delay before the first retry.
    pub fn initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    /// Sets a ceiling on the backoff delay.
    pub fn max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = Some(delay);
        self
    }

    /// Sets the upper bound for random jitter added to each backoff.
    pub fn max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    /// Returns the delay before retry number `attempt + 1`, without jitter.
    ///
    /// Doubles per attempt from `initial_backoff`, saturating instead of
    /// overflowing, then applies `max_backoff` if set.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let delay = self.initial_backoff.saturating_mul(factor);
        match self.max_backoff {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Returns the delay before retry number `attempt + 1`, with jitter.
    pub(crate) fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.backoff(attempt);
        if self.max_jitter.is_zero() {
            return base;
        }
        let jitter = rand::rng().random_range(Duration::ZERO..=self.max_jitter);
        base.saturating_add(jitter)
    }
}
