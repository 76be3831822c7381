//! Rate limited, retrying executor for remote operations.

use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::PacerConfig;
use crate::error::{ConfigError, RetryError, Retryable};
use crate::rate_limit::{RetryPolicy, TokenBucket};

/// Rate limited, retrying executor.
///
/// Wraps a remote operation so that every attempt first takes a permit
/// from a shared [`TokenBucket`], transient failures are retried with
/// exponential backoff, and permanent failures surface immediately.
///
/// Cloning is cheap; clones draw from the same bucket and therefore
/// share its quota.
///
/// # Example
///
/// ```no_run
/// use pacer_lib::Pacer;
/// use pacer_lib::error::Retryable;
/// use pacer_lib::rate_limit::{RetryPolicy, TokenBucket};
///
/// #[derive(Debug, thiserror::Error)]
/// enum FetchError {
///     #[error("service unavailable")]
///     Unavailable,
///     #[error("not authorized")]
///     Unauthorized,
/// }
///
/// impl Retryable for FetchError {
///     fn is_retryable(&self) -> bool {
///         matches!(self, Self::Unavailable)
///     }
/// }
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let pacer = Pacer::new(TokenBucket::per_minute(100)?)
///     .policy(RetryPolicy::default().max_retries(5));
///
/// let device = pacer.run(|| fetch_device("core-sw-01")).await?;
/// # Ok(())
/// # }
/// # async fn fetch_device(_name: &str) -> Result<String, FetchError> { Ok(String::new()) }
/// ```
#[derive(Clone)]
pub struct Pacer {
    bucket: TokenBucket,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl Pacer {
    /// Creates an executor drawing permits from `bucket`, with the default
    /// retry policy and no cancellation signal.
    pub fn new(bucket: TokenBucket) -> Self {
        Self {
            bucket,
            policy: RetryPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Sets the retry policy.
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the cancellation token observed at every wait.
    ///
    /// Cancelling the token makes in-progress and future
    /// [`run`](Self::run) calls return [`RetryError::Cancelled`] at their
    /// next suspension point. An operation future that is already
    /// executing is not interrupted.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Builds an executor from validated settings.
    ///
    /// # Errors
    ///
    /// Fails if the settings cannot produce a usable bucket.
    pub fn from_config(config: &PacerConfig) -> Result<Self, ConfigError> {
        let bucket = TokenBucket::per_minute(config.calls_per_minute)?;
        Ok(Self::new(bucket).policy(config.retry_policy()))
    }

    /// Builds an executor from `PACER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails on malformed or out-of-range environment values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(&PacerConfig::from_env()?)
    }

    /// Returns the bucket this executor draws permits from.
    pub fn bucket(&self) -> &TokenBucket {
        &self.bucket
    }

    /// Returns the retry policy in effect.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `operation` under the rate limit, retrying transient failures.
    ///
    /// Each attempt spends one token, waiting for refill when the bucket
    /// is drained. A successful attempt returns immediately. A failure
    /// whose [`is_retryable`](Retryable::is_retryable) is `false` returns
    /// [`RetryError::Permanent`] immediately. Transient failures sleep
    /// with exponential backoff and retry, up to the policy's budget;
    /// once the budget is spent the last error comes back inside
    /// [`RetryError::Exhausted`].
    ///
    /// The operation is invoked once per attempt, so it must be callable
    /// repeatedly. Each failed attempt is logged at warn level,
    /// exhaustion at error level.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Cancelled`] if the executor's cancellation
    /// token fires while waiting for a permit or during backoff.
    pub async fn run<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
    {
        let mut attempt: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                debug!(attempt = attempt + 1, "cancelled before attempt");
                return Err(RetryError::Cancelled);
            }

            tokio::select! {
                result = self.bucket.acquire(1) => {
                    // Capacity is validated at construction, so a single
                    // permit request cannot exceed it.
                    result.expect("single permit request should never exceed capacity");
                }
                () = self.cancel.cancelled() => {
                    debug!(attempt = attempt + 1, "cancelled while waiting for a permit");
                    return Err(RetryError::Cancelled);
                }
            }

            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempts = attempt + 1, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => {
                    warn!(attempt = attempt + 1, error = %e, "permanent failure, not retrying");
                    return Err(RetryError::Permanent(e));
                }
                Err(e) if attempt >= self.policy.max_retries => {
                    error!(attempts = attempt + 1, error = %e, "retries exhausted");
                    return Err(RetryError::Exhausted {
                        attempts: attempt + 1,
                        last: e,
                    });
                }
                Err(e) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient failure, retrying"
                    );

                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = self.cancel.cancelled() => {
                            debug!(attempt = attempt + 1, "cancelled during backoff");
                            return Err(RetryError::Cancelled);
                        }
                    }

                    attempt += 1;
                }
            }
        }
    }
}
