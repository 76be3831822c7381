//! Rate limiting and retry scheduling.

mod bucket;
mod policy;

pub use bucket::TokenBucket;
pub use policy::RetryPolicy;
