//! Source reader trait and implementations.
//!
//! This module defines the `SourceReader` trait, which provides a unified
//! interface for fetching the text a scraper procedure searches, regardless
//! of whether it lives on the local filesystem or behind a URL.

#[cfg(feature = "http")]
mod http;
mod local;
#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "http")]
pub use self::http::HttpReader;
pub use self::local::LocalReader;
#[cfg(feature = "mock")]
pub use self::mock::MockReader;
use crate::error::{ErrorKind, Result};
use crate::reference::Reference;
use std::sync::Arc;
use tracing::instrument;

/// Unified interface for source readers.
///
/// Reads are synchronous; the scraper engine never parallelizes them. A read
/// either yields the full text content of the reference or an error. An
/// unreadable source is never reported as empty content.
///
/// # Examples
///
/// ```
/// use sift_source::{SourceReader, error::Result};
///
/// fn line_count(reader: &dyn SourceReader, reference: &str) -> Result<usize> {
///     Ok(reader.read(reference)?.lines().count())
/// }
/// ```
pub trait SourceReader: Send + Sync {
    /// Name of the reader (used for logging only).
    fn name(&self) -> &str;

    /// Read the whole content behind a resolved reference as text.
    fn read(&self, reference: &str) -> Result<String>;
}
impl<T: SourceReader + ?Sized> SourceReader for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&self, reference: &str) -> Result<String> {
        (**self).read(reference)
    }
}
impl<T: SourceReader + ?Sized> SourceReader for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&self, reference: &str) -> Result<String> {
        (**self).read(reference)
    }
}

/// Routes `http(s)://` references to a remote reader and everything else to
/// a [`LocalReader`].
///
/// Without a remote reader configured, URLs fail with
/// [`ErrorKind::Unsupported`].
pub struct DispatchReader {
    local: LocalReader,
    remote: Option<Box<dyn SourceReader>>,
}
impl DispatchReader {
    pub fn new(local: LocalReader) -> Self {
        Self { local, remote: None }
    }

    pub fn with_remote(mut self, remote: impl SourceReader + 'static) -> Self {
        self.remote = Some(Box::new(remote));
        self
    }
}
impl SourceReader for DispatchReader {
    fn name(&self) -> &str {
        "dispatch"
    }

    #[instrument(level = "trace", skip(self))]
    fn read(&self, reference: &str) -> Result<String> {
        match Reference::parse(reference) {
            Reference::Remote(url) => match &self.remote {
                Some(remote) => remote.read(url),
                None => exn::bail!(ErrorKind::Unsupported(reference.to_string())),
            },
            Reference::Local(_) => self.local.read(reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Echo;
    impl SourceReader for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn read(&self, reference: &str) -> Result<String> {
            Ok(format!("remote:{reference}"))
        }
    }

    #[test]
    fn test_dispatch_routes_urls_to_remote() {
        let reader = DispatchReader::new(LocalReader::new("local")).with_remote(Echo);
        assert_eq!(reader.read("https://example.com/a").unwrap(), "remote:https://example.com/a");
    }

    #[test]
    fn test_dispatch_without_remote_is_unsupported() {
        let reader = DispatchReader::new(LocalReader::new("local"));
        let err = reader.read("http://example.com/a").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Unsupported(_)));
    }

    #[test]
    fn test_dispatch_routes_paths_to_local() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("movie.nfo"), "Title: Inception").unwrap();
        let reader = DispatchReader::new(LocalReader::new("local").with_root(dir.path())).with_remote(Echo);
        assert_eq!(reader.read("movie.nfo").unwrap(), "Title: Inception");
    }
}
