//! Token bucket rate limiter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{AcquireError, ConfigError};

/// Smallest sleep while waiting for tokens to accumulate. Floating point
/// rounding can produce waits of zero; flooring keeps waiters from spinning.
const MIN_WAIT: Duration = Duration::from_millis(1);

/// Token bucket rate limiter.
///
/// Holds up to `capacity` tokens and refills continuously at
/// `capacity / window` tokens per second. Callers spend one token per
/// request (or more, for expensive requests); once the bucket drains,
/// callers wait for the refill rather than failing. Default is
/// 100 requests per minute.
///
/// The bucket is cheap to clone and can be shared across tasks that
/// should draw from the same quota.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pacer_lib::rate_limit::TokenBucket;
///
/// // 100 requests per minute
/// let bucket = TokenBucket::per_minute(100)?;
///
/// // Custom: 50 requests per 10 seconds
/// let custom = TokenBucket::new(50, Duration::from_secs(10))?;
/// # Ok::<(), pacer_lib::error::ConfigError>(())
/// ```
#[derive(Clone, Debug)]
pub struct TokenBucket {
    inner: Arc<BucketInner>,
}

#[derive(Debug)]
struct BucketInner {
    state: Mutex<BucketState>,
    capacity: u32,
    /// Tokens regained per second.
    refill_rate: f64,
}

#[derive(Debug)]
struct BucketState {
    /// Fractional tokens currently available, always within `[0, capacity]`.
    tokens: f64,
    /// When `tokens` was last brought up to date.
    last_refill: Instant,
}

impl BucketState {
    /// Credits tokens for the time elapsed since the last refill,
    /// capped at capacity.
    fn refill(&mut self, capacity: u32, rate: f64) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(f64::from(capacity));
        self.last_refill = now;
    }
}

impl TokenBucket {
    /// Creates a bucket that refills `capacity` tokens over `window`.
    ///
    /// The bucket starts full.
    ///
    /// # Errors
    ///
    /// Fails if `capacity` is zero or `window` is empty; neither can ever
    /// grant a permit.
    pub fn new(capacity: u32, window: Duration) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }

        Ok(Self {
            inner: Arc::new(BucketInner {
                state: Mutex::new(BucketState {
                    tokens: f64::from(capacity),
                    last_refill: Instant::now(),
                }),
                capacity,
                refill_rate: f64::from(capacity) / window.as_secs_f64(),
            }),
        })
    }

    /// Creates a bucket allowing `calls_per_minute` requests per minute.
    ///
    /// # Errors
    ///
    /// Fails if `calls_per_minute` is zero.
    pub fn per_minute(calls_per_minute: u32) -> Result<Self, ConfigError> {
        Self::new(calls_per_minute, Duration::from_secs(60))
    }

    /// Acquires `permits` tokens, waiting for refill when necessary.
    ///
    /// Waiters are granted in no particular order; whichever re-checks the
    /// bucket first after a refill wins. The returned future is safe to
    /// drop before completion; tokens are only deducted on success.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::ExceedsCapacity`] immediately, without
    /// waiting, if `permits` exceeds the bucket capacity.
    pub async fn acquire(&self, permits: u32) -> Result<(), AcquireError> {
        if permits > self.inner.capacity {
            return Err(AcquireError::ExceedsCapacity {
                requested: permits,
                capacity: self.inner.capacity,
            });
        }

        let needed = f64::from(permits);
        loop {
            let wait = {
                let mut state = self.inner.state.lock().await;
                state.refill(self.inner.capacity, self.inner.refill_rate);

                if state.tokens >= needed {
                    state.tokens -= needed;
                    return Ok(());
                }

                wait_for_deficit(needed - state.tokens, self.inner.refill_rate)
            };

            // Wait outside the lock, then re-check; another task may have
            // taken the tokens in the meantime.
            let wait = wait.max(MIN_WAIT);
            debug!(wait_ms = wait.as_millis() as u64, "bucket drained, waiting for refill");
            tokio::time::sleep(wait).await;
        }
    }

    /// Acquires `permits` tokens only if they are available right now.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::RateLimited`] with the time until enough
    /// tokens will have accumulated, or [`AcquireError::ExceedsCapacity`]
    /// if `permits` exceeds the bucket capacity.
    pub async fn try_acquire(&self, permits: u32) -> Result<(), AcquireError> {
        if permits > self.inner.capacity {
            return Err(AcquireError::ExceedsCapacity {
                requested: permits,
                capacity: self.inner.capacity,
            });
        }

        let needed = f64::from(permits);
        let mut state = self.inner.state.lock().await;
        state.refill(self.inner.capacity, self.inner.refill_rate);

        if state.tokens >= needed {
            state.tokens -= needed;
            return Ok(());
        }

        Err(AcquireError::RateLimited {
            retry_after: wait_for_deficit(needed - state.tokens, self.inner.refill_rate),
        })
    }

    /// Returns the number of tokens available right now.
    pub async fn available(&self) -> f64 {
        let mut state = self.inner.state.lock().await;
        state.refill(self.inner.capacity, self.inner.refill_rate);
        state.tokens
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> u32 {
        self.inner.capacity
    }

    /// Returns the refill rate in tokens per second.
    pub fn refill_rate(&self) -> f64 {
        self.inner.refill_rate
    }
}

impl Default for TokenBucket {
    fn default() -> Self {
        Self::per_minute(100).expect("default bucket parameters are valid")
    }
}

/// Converts a token deficit into a wait, saturating on overflow.
fn wait_for_deficit(deficit: f64, rate: f64) -> Duration {
    Duration::try_from_secs_f64(deficit / rate).unwrap_or(Duration::MAX)
}
