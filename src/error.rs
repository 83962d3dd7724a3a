//! Error types for the cache crate
//!
//! Cache operations themselves never fail; absent keys are reported as `None`.
//! The only fallible surface is strict configuration loading.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidConfig {
        /// Name of the offending variable
        var: String,
        /// The raw value that failed to parse
        value: String,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
