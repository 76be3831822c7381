//! Environment driven configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::rate_limit::RetryPolicy;

const ENV_CALLS_PER_MINUTE: &str = "PACER_CALLS_PER_MINUTE";
const ENV_MAX_RETRIES: &str = "PACER_MAX_RETRIES";
const ENV_MAX_BACKOFF_SECS: &str = "PACER_MAX_BACKOFF_SECS";
const ENV_MAX_JITTER_MS: &str = "PACER_MAX_JITTER_MS";

/// Executor settings, readable from the environment.
///
/// Every field has a default, so `PacerConfig::default()` works without
/// any environment at all. [`from_env`](Self::from_env) layers `PACER_*`
/// variables (and a `.env` file, if present) on top of the defaults and
/// rejects malformed or out-of-range values before anything is built
/// from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacerConfig {
    /// Bucket capacity, refilled over one minute.
    pub calls_per_minute: u32,
    /// Maximum retry attempts after the first try.
    pub max_retries: u32,
    /// Ceiling on backoff delays, if any.
    pub max_backoff: Option<Duration>,
    /// Upper bound on random extra backoff delay.
    pub max_jitter: Duration,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            calls_per_minute: 100,
            max_retries: 3,
            max_backoff: None,
            max_jitter: Duration::ZERO,
        }
    }
}

impl PacerConfig {
    /// Reads configuration from `PACER_*` environment variables.
    ///
    /// Unset variables keep their defaults:
    ///
    /// * `PACER_CALLS_PER_MINUTE` - bucket capacity, 1 to 1000 (default 100)
    /// * `PACER_MAX_RETRIES` - retry budget, 0 to 10 (default 3)
    /// * `PACER_MAX_BACKOFF_SECS` - backoff ceiling, 1 to 3600 (default none)
    /// * `PACER_MAX_JITTER_MS` - jitter bound, 0 to 60000 (default 0)
    ///
    /// A `.env` file in the working directory is honored if present.
    ///
    /// # Errors
    ///
    /// Fails on any value that does not parse or falls outside its range.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(raw) = std::env::var(ENV_CALLS_PER_MINUTE) {
            config.calls_per_minute = parse_in_range(ENV_CALLS_PER_MINUTE, &raw, 1, 1000)? as u32;
        }
        if let Ok(raw) = std::env::var(ENV_MAX_RETRIES) {
            config.max_retries = parse_in_range(ENV_MAX_RETRIES, &raw, 0, 10)? as u32;
        }
        if let Ok(raw) = std::env::var(ENV_MAX_BACKOFF_SECS) {
            let secs = parse_in_range(ENV_MAX_BACKOFF_SECS, &raw, 1, 3600)?;
            config.max_backoff = Some(Duration::from_secs(secs));
        }
        if let Ok(raw) = std::env::var(ENV_MAX_JITTER_MS) {
            let ms = parse_in_range(ENV_MAX_JITTER_MS, &raw, 0, 60_000)?;
            config.max_jitter = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Returns the retry policy described by this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::new(self.max_retries).max_jitter(self.max_jitter);
        if let Some(cap) = self.max_backoff {
            policy = policy.max_backoff(cap);
        }
        policy
    }
}

/// Parses a decimal setting and checks it against an inclusive range.
fn parse_in_range(name: &str, raw: &str, min: u64, max: u64) -> Result<u64, ConfigError> {
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(name, raw, "expected a non-negative integer"))?;
    if value < min || value > max {
        return Err(ConfigError::out_of_range(name, value, min, max));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PacerConfig::default();
        assert_eq!(config.calls_per_minute, 100);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_backoff, None);
        assert_eq!(config.max_jitter, Duration::ZERO);
    }

    #[test]
    fn parse_accepts_values_in_range() {
        assert_eq!(parse_in_range("X", "1", 1, 1000), Ok(1));
        assert_eq!(parse_in_range("X", "1000", 1, 1000), Ok(1000));
        assert_eq!(parse_in_range("X", " 42 ", 1, 1000), Ok(42));
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_in_range("X", "fast", 1, 1000).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = parse_in_range("X", "-3", 0, 10).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn parse_rejects_out_of_range() {
        let err = parse_in_range("X", "1001", 1, 1000).unwrap_err();
        assert_eq!(err, ConfigError::out_of_range("X", 1001, 1, 1000));

        let err = parse_in_range("X", "0", 1, 1000).unwrap_err();
        assert_eq!(err, ConfigError::out_of_range("X", 0, 1, 1000));
    }

    #[test]
    fn retry_policy_carries_settings() {
        let config = PacerConfig {
            calls_per_minute: 100,
            max_retries: 5,
            max_backoff: Some(Duration::from_secs(30)),
            max_jitter: Duration::from_millis(250),
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.max_backoff, Some(Duration::from_secs(30)));
        assert_eq!(policy.max_jitter, Duration::from_millis(250));
        assert_eq!(policy.initial_backoff, Duration::from_secs(1));
    }
}
