//! In-memory source reader for testing.

use crate::error::{ErrorKind, Result};
use crate::reader::SourceReader;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// In-memory source reader for testing.
///
/// References are looked up verbatim (no path normalization), and every read
/// attempt is counted, including failed ones, so tests can assert on caching
/// behaviour.
///
/// # Examples
///
/// ```
/// use sift_source::{MockReader, SourceReader};
///
/// let reader = MockReader::with_files([("movie.mkv.nfo", "Title: Inception")]);
/// assert_eq!(reader.read("movie.mkv.nfo").unwrap(), "Title: Inception");
/// assert_eq!(reader.reads("movie.mkv.nfo"), 1);
/// assert!(reader.read("other.nfo").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockReader {
    files: HashMap<String, String>,
    reads: Mutex<HashMap<String, usize>>,
}
impl MockReader {
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            files: files.into_iter().map(|(reference, content)| (reference.into(), content.into())).collect(),
            reads: Mutex::default(),
        }
    }

    /// Number of read attempts made for `reference`.
    pub fn reads(&self, reference: &str) -> usize {
        self.reads.lock().unwrap_or_else(PoisonError::into_inner).get(reference).copied().unwrap_or(0)
    }

    /// Number of read attempts made for all references.
    pub fn total_reads(&self) -> usize {
        self.reads.lock().unwrap_or_else(PoisonError::into_inner).values().sum()
    }
}
impl SourceReader for MockReader {
    fn name(&self) -> &str {
        "mock"
    }

    fn read(&self, reference: &str) -> Result<String> {
        *self
            .reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(reference.to_string())
            .or_default() += 1;
        match self.files.get(reference) {
            Some(content) => Ok(content.clone()),
            None => exn::bail!(ErrorKind::NotFound(reference.to_string())),
        }
    }
}
