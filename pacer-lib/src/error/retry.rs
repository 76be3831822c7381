//! Retry outcome types and failure classification

/// Classifies operation failures as transient or permanent.
///
/// The executor keeps retrying only while errors report
/// `is_retryable() == true`. Transient failures are typically network
/// errors, timeouts, and 5xx-class responses; authorization failures and
/// malformed requests are permanent and surface immediately.
pub trait Retryable {
    /// Returns `true` if this failure is transient and worth retrying.
    fn is_retryable(&self) -> bool;
}

/// Terminal failure of a retried operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetryError<E> {
    /// The operation failed in a way that must not be retried.
    #[error("permanent failure: {0}")]
    Permanent(E),

    /// Every allowed attempt failed.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// Total attempts made, including the first try.
        attempts: u32,
        /// Error from the final attempt.
        last: E,
    },

    /// The executor was cancelled before the operation completed.
    #[error("operation cancelled")]
    Cancelled,
}

impl<E> RetryError<E> {
    /// Returns the number of attempts made, if the retry budget was spent.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Exhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// Returns the underlying operation error, if any.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            Self::Permanent(last) | Self::Exhausted { last, .. } => Some(last),
            Self::Cancelled => None,
        }
    }

    /// Consumes the failure and returns the underlying operation error, if any.
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::Permanent(last) | Self::Exhausted { last, .. } => Some(last),
            Self::Cancelled => None,
        }
    }

    /// Returns `true` if the executor was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
