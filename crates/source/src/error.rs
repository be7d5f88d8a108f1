//! Source Reader Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A source reader error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for source reader operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The referenced file or resource does not exist.
    #[display("source not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Access denied (permissions or credentials).
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] String),
    /// Underlying I/O error.
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Network-related error (connection, timeout, non-success status).
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// No configured reader can handle this kind of reference.
    #[display("unsupported reference: {_0}")]
    Unsupported(#[error(not(source))] String),
    /// The source looked compressed but could not be decompressed.
    #[display("failed to decompress {_0}")]
    Decompression(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Network(_))
    }
}
