//! Definition documents on disk.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format as _, Json, Toml, Yaml};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Serialization format of a document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}
impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parses one document.
#[instrument(level = "trace")]
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let figment = match Format::from_path(path) {
        Some(Format::Json) => Figment::from(Json::file_exact(path)),
        Some(Format::Toml) => Figment::from(Toml::file_exact(path)),
        Some(Format::Yaml) => Figment::from(Yaml::file_exact(path)),
        None => exn::bail!(ErrorKind::InvalidDocument(format!("{}: unsupported extension", path.display()))),
    };
    figment
        .extract()
        .or_raise(|| ErrorKind::InvalidDocument(path.display().to_string()))
}

/// Every document in `dir`, sorted by path. Files with other extensions are
/// skipped.
pub fn list(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).or_raise(|| ErrorKind::Directory(dir.display().to_string()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.or_raise(|| ErrorKind::Directory(dir.display().to_string()))?.path();
        if path.is_file() && Format::from_path(&path).is_some() {
            paths.push(path);
        } else {
            tracing::trace!(path = %path.display(), "skipping");
        }
    }
    paths.sort();
    Ok(paths)
}
