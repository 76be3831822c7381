//! Rate limited, retrying execution for remote operations
//!
//! Pairs a token bucket rate limiter with an exponential backoff retry
//! executor. Operations are paced against a shared quota, transient
//! failures retry with doubling delays, and permanent failures surface
//! immediately as typed errors.

pub mod config;
pub mod error;
pub mod rate_limit;

mod pacer;

pub use config::PacerConfig;
pub use pacer::*;
