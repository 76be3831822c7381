//! Tests for error types and failure classification.

use std::time::Duration;

use pacer_lib::error::{AcquireError, ConfigError, RetryError, Retryable};

#[test]
fn test_rate_limited_display_and_accessor() {
    let err = AcquireError::RateLimited {
        retry_after: Duration::from_secs(30),
    };
    let display = format!("{}", err);
    assert!(display.contains("rate limit exceeded"));
    assert!(display.contains("30"));
    assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
}

#[test]
fn test_exceeds_capacity_display_and_accessor() {
    let err = AcquireError::ExceedsCapacity {
        requested: 12,
        capacity: 10,
    };
    let display = format!("{}", err);
    assert!(display.contains("12"));
    assert!(display.contains("10"));
    assert_eq!(err.retry_after(), None);
}

#[test]
fn test_acquire_error_classification() {
    let limited = AcquireError::RateLimited {
        retry_after: Duration::from_secs(1),
    };
    let oversized = AcquireError::ExceedsCapacity {
        requested: 2,
        capacity: 1,
    };
    assert!(limited.is_retryable());
    assert!(!oversized.is_retryable());
}

#[test]
fn test_retry_error_display() {
    let permanent: RetryError<String> = RetryError::Permanent("bad token".to_string());
    assert!(format!("{}", permanent).contains("permanent failure: bad token"));

    let exhausted: RetryError<String> = RetryError::Exhausted {
        attempts: 4,
        last: "connection reset".to_string(),
    };
    let display = format!("{}", exhausted);
    assert!(display.contains("4 attempts"));
    assert!(display.contains("connection reset"));

    let cancelled: RetryError<String> = RetryError::Cancelled;
    assert!(format!("{}", cancelled).contains("cancelled"));
}

#[test]
fn test_retry_error_accessors() {
    let permanent: RetryError<String> = RetryError::Permanent("nope".to_string());
    assert_eq!(permanent.attempts(), None);
    assert_eq!(permanent.last_error(), Some(&"nope".to_string()));
    assert!(!permanent.is_cancelled());

    let exhausted: RetryError<String> = RetryError::Exhausted {
        attempts: 3,
        last: "timeout".to_string(),
    };
    assert_eq!(exhausted.attempts(), Some(3));
    assert_eq!(exhausted.last_error(), Some(&"timeout".to_string()));
    assert_eq!(exhausted.into_last_error(), Some("timeout".to_string()));

    let cancelled: RetryError<String> = RetryError::Cancelled;
    assert!(cancelled.is_cancelled());
    assert_eq!(cancelled.attempts(), None);
    assert_eq!(cancelled.last_error(), None);
    assert_eq!(cancelled.into_last_error(), None);
}

#[test]
fn test_config_error_display() {
    assert!(format!("{}", ConfigError::ZeroCapacity).contains("capacity"));
    assert!(format!("{}", ConfigError::ZeroWindow).contains("window"));

    let invalid = ConfigError::invalid("PACER_MAX_RETRIES", "many", "expected a non-negative integer");
    let display = format!("{}", invalid);
    assert!(display.contains("PACER_MAX_RETRIES"));
    assert!(display.contains("many"));
    assert!(display.contains("expected a non-negative integer"));

    let range = ConfigError::out_of_range("PACER_CALLS_PER_MINUTE", 5000, 1, 1000);
    let display = format!("{}", range);
    assert!(display.contains("PACER_CALLS_PER_MINUTE"));
    assert!(display.contains("5000"));
    assert!(display.contains("1000"));
}

#[test]
fn test_errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: &E) {}

    assert_error(&AcquireError::RateLimited {
        retry_after: Duration::from_secs(1),
    });
    assert_error(&ConfigError::ZeroCapacity);
    assert_error(&RetryError::<String>::Cancelled);
}
