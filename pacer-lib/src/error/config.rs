//! Configuration error types

/// Errors from invalid limiter or executor configuration.
///
/// Construction fails eagerly so that misconfiguration surfaces at
/// startup instead of hanging or silently misbehaving on the request path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Bucket capacity must be at least one permit.
    #[error("bucket capacity must be greater than zero")]
    ZeroCapacity,

    /// Refill window must be a positive duration.
    #[error("refill window must be greater than zero")]
    ZeroWindow,

    /// A setting could not be parsed.
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        /// Name of the offending setting.
        name: String,
        /// The rejected raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A setting was outside its allowed range.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Name of the offending setting.
        name: String,
        /// The rejected value.
        value: u64,
        /// Smallest allowed value.
        min: u64,
        /// Largest allowed value.
        max: u64,
    },
}

impl ConfigError {
    /// Creates a new invalid-value error.
    pub fn invalid(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new out-of-range error.
    pub fn out_of_range(name: impl Into<String>, value: u64, min: u64, max: u64) -> Self {
        Self::OutOfRange {
            name: name.into(),
            value,
            min,
            max,
        }
    }
}
