//! Retrying a deliberately flaky operation under a rate limit.
//!
//! Run with: cargo run --example flaky_operation
//!
//! Set RUST_LOG=debug to see per-attempt logging.

use std::sync::atomic::{AtomicU32, Ordering};

use pacer_lib::Pacer;
use pacer_lib::error::{RetryError, Retryable};
use pacer_lib::rate_limit::{RetryPolicy, TokenBucket};

#[derive(Debug, thiserror::Error)]
enum UpstreamError {
    #[error("upstream unavailable")]
    Unavailable,
    #[error("bad request")]
    BadRequest,
}

impl Retryable for UpstreamError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bucket = TokenBucket::per_minute(30)?;
    let pacer = Pacer::new(bucket).policy(RetryPolicy::default().max_retries(4));

    // Fails twice, then recovers. Watch the 1s/2s backoff between attempts.
    let calls = AtomicU32::new(0);
    let payload = pacer
        .run(|| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                println!("attempt {attempt}...");
                if attempt < 3 {
                    Err(UpstreamError::Unavailable)
                } else {
                    Ok(format!("payload fetched on attempt {attempt}"))
                }
            }
        })
        .await?;
    println!("{payload}\n");

    // Permanent failures come back immediately, with no retries spent.
    let outcome: Result<String, _> = pacer.run(|| async { Err(UpstreamError::BadRequest) }).await;
    match outcome {
        Err(RetryError::Permanent(e)) => println!("gave up immediately: {e}"),
        other => println!("unexpected outcome: {other:?}"),
    }

    Ok(())
}
