//! Classification of resolved source references.
//!
//! A reference is whatever a procedure's `source` template expands to: a
//! local path (optionally `file://`-prefixed) or an `http(s)://` URL.

use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// A source reference, split by where its content lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<'a> {
    Local(&'a Path),
    Remote(&'a str),
}
impl<'a> Reference<'a> {
    pub fn parse(reference: &'a str) -> Self {
        if is_remote(reference) {
            return Self::Remote(reference);
        }
        Self::Local(Path::new(reference.strip_prefix(FILE_SCHEME).unwrap_or(reference)))
    }

    /// Joins relative local paths onto `root`; absolute paths and URLs are
    /// left alone.
    pub fn local_path(&self, root: Option<&Path>) -> Option<PathBuf> {
        match self {
            Self::Local(path) => Some(match root {
                Some(root) if path.is_relative() => root.join(path),
                _ => path.to_path_buf(),
            }),
            Self::Remote(_) => None,
        }
    }
}

/// Returns `true` for `http://` and `https://` references (scheme is
/// case-insensitive).
pub fn is_remote(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
