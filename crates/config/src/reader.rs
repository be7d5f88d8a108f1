//! Source reader construction from settings.

use crate::error::Result;
use crate::settings::Config;
use sift_source::{DispatchReader, LocalReader};

/// The reader every scraper shares: local files under the configured root,
/// plus HTTP when it is enabled and compiled in.
pub fn build_reader(config: &Config) -> Result<DispatchReader> {
    let mut local = LocalReader::new("local");
    if let Some(root) = &config.root {
        local = local.with_root(root);
    }
    let reader = DispatchReader::new(local);
    with_http(reader, config)
}

#[cfg(feature = "http")]
fn with_http(reader: DispatchReader, config: &Config) -> Result<DispatchReader> {
    use crate::error::ErrorKind;
    use exn::ResultExt;
    use sift_source::HttpReader;
    use std::time::Duration;

    if !config.http.enabled {
        return Ok(reader);
    }
    let timeout = Duration::from_secs(config.http.timeout_seconds);
    let http = HttpReader::new("http", timeout, &config.http.user_agent).or_raise(|| ErrorKind::Reader)?;
    Ok(reader.with_remote(http))
}

#[cfg(not(feature = "http"))]
fn with_http(reader: DispatchReader, config: &Config) -> Result<DispatchReader> {
    if config.http.enabled {
        tracing::debug!("built without HTTP support; URL sources are unsupported");
    }
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_source::SourceReader;
    use std::fs;

    #[test]
    fn test_local_reads_are_rooted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("movie.mkv.nfo"), "Title: Inception").unwrap();
        let config = Config {
            root: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let reader = build_reader(&config).unwrap();
        assert_eq!(reader.read("movie.mkv.nfo").unwrap(), "Title: Inception");
    }

    #[test]
    fn test_urls_rejected_when_http_disabled() {
        let mut config = Config::default();
        config.http.enabled = false;
        let reader = build_reader(&config).unwrap();
        assert!(reader.read("https://example.com/movie.nfo").is_err());
    }
}
