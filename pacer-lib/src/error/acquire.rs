//! Permit acquisition error types

use std::time::Duration;

use super::Retryable;

/// Errors that can occur when requesting permits from a token bucket.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquireError {
    /// Not enough tokens are available right now.
    #[error("rate limit exceeded, retry after {retry_after:?}")]
    RateLimited {
        /// Time until enough tokens will have accumulated.
        retry_after: Duration,
    },

    /// More permits requested than the bucket can ever hold.
    #[error("requested {requested} permits but capacity is {capacity}")]
    ExceedsCapacity {
        /// Number of permits requested.
        requested: u32,
        /// Configured bucket capacity.
        capacity: u32,
    },
}

impl AcquireError {
    /// Returns the suggested wait before retrying, if there is one.
    ///
    /// `ExceedsCapacity` has no wait; no amount of refill can satisfy it.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            Self::ExceedsCapacity { .. } => None,
        }
    }
}

impl Retryable for AcquireError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
