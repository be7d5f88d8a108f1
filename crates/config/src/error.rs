//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Settings could not be loaded, or hold values that can't be used.
    #[display("invalid configuration: {_0}")]
    InvalidConfig(#[error(not(source))] String),
    /// A scraper or media type document could not be parsed.
    #[display("invalid document: {_0}")]
    InvalidDocument(#[error(not(source))] String),
    /// A definitions directory could not be listed.
    #[display("could not read directory: {_0}")]
    Directory(#[error(not(source))] String),
    /// The source reader could not be constructed from the settings.
    #[display("could not build source reader")]
    Reader,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::InvalidDocument("scrapers/nfo.yaml".to_string()).to_string(),
            "invalid document: scrapers/nfo.yaml"
        );
        assert_eq!(ErrorKind::Reader.to_string(), "could not build source reader");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Directory("scrapers".to_string()).is_retryable());
        assert!(!ErrorKind::InvalidConfig("timeout".to_string()).is_retryable());
    }
}
