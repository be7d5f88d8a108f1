//! Local filesystem source reader.
//!
//! Reads sidecar files (`.nfo`, `.txt`, `.json`, ...) next to media items.
//! Files ending in `.gz` or `.bz2` are decompressed transparently, and bytes
//! that are not valid UTF-8 are replaced with U+FFFD rather than rejected.

use crate::compression::Compression;
use crate::error::{ErrorKind, Result};
use crate::reader::SourceReader;
use crate::reference::Reference;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Local filesystem source reader.
///
/// Relative references are resolved against the configured root, or against
/// the process working directory when no root is set.
///
/// # Examples
///
/// ```no_run
/// use sift_source::{LocalReader, SourceReader};
///
/// let reader = LocalReader::new("local").with_root("/media/movies");
/// let nfo = reader.read("Inception (2010)/movie.nfo").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct LocalReader {
    name: String,
    root: Option<PathBuf>,
}
impl LocalReader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
        }
    }

    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    fn path(&self, reference: &str) -> Result<PathBuf> {
        match Reference::parse(reference).local_path(self.root.as_deref()) {
            Some(path) => Ok(path),
            None => exn::bail!(ErrorKind::Unsupported(reference.to_string())),
        }
    }

    fn map_io_error(e: std::io::Error, reference: &str) -> ErrorKind {
        match e.kind() {
            IoErrorKind::NotFound => ErrorKind::NotFound(reference.to_string()),
            IoErrorKind::PermissionDenied => ErrorKind::PermissionDenied(reference.to_string()),
            _ => ErrorKind::Io(e),
        }
    }
}
impl SourceReader for LocalReader {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(reader = %self.name))]
    fn read(&self, reference: &str) -> Result<String> {
        let path = self.path(reference)?;
        let bytes = fs::read(&path).map_err(|e| Self::map_io_error(e, reference))?;
        let bytes = Compression::from_path(&path).decompress(bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
