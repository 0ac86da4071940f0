//! Error types for the cache crate
//!
//! Cache operations never fail: a missing or expired key is an ordinary
//! `false`/`None` result. Errors only come from loading configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidConfig { var: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
