//! Command-Line Error Types

use derive_more::{Display, Error};

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Settings or definition documents could not be loaded.
    #[display("could not load configuration")]
    Config,
    /// `--scraper` named a scraper that isn't in the catalog.
    #[display("unknown scraper: {_0}")]
    UnknownScraper(#[error(not(source))] String),
    /// The requested scraper failed validation.
    #[display("scraper {_0} is invalid")]
    InvalidScraper(#[error(not(source))] String),
    /// No valid scraper recognises the location.
    #[display("no scraper matches {_0}")]
    NoMatch(#[error(not(source))] String),
    /// The record could not be printed.
    #[display("could not write output")]
    Output,
}
