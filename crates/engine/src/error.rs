//! Engine Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Only definition-level problems are errors. Everything that can go wrong
//! while walking a procedure tree is reported as a [`Warning`](crate::Warning)
//! and the scrape carries on.

use derive_more::{Display, Error};

/// An engine error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The scraper definition is malformed, or was never successfully
    /// prepared. Fix the definition document; the scraper refuses to run.
    #[display("invalid scraper definition: {_0}")]
    InvalidDefinition(#[error(not(source))] String),
    /// A regular expression in the definition does not compile.
    #[display("invalid regular expression: {_0}")]
    InvalidPattern(#[error(not(source))] String),
    /// The type registry has no defaults for the scraper's target type.
    #[display("unknown media type: {_0}")]
    UnknownType(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Definitions are either valid or they aren't.
        false
    }
}
