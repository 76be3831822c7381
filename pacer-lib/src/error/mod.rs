//! Error types

mod acquire;
mod config;
mod retry;

pub use acquire::*;
pub use config::*;
pub use retry::*;
