//! The media types and scraper definitions available to the front end.

use crate::document;
use crate::error::{ErrorKind, Result};
use serde::Deserialize;
use sift_engine::{Details, ScraperDefinition, TypeRegistry};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::instrument;

/// A media type document: a name and the details every record of that type
/// starts with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaType {
    pub name: String,
    #[serde(default)]
    pub defaults: Details,
}

/// Media types and scraper definitions, keyed and ordered by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: BTreeMap<String, Details>,
    scrapers: BTreeMap<String, ScraperDefinition>,
}
impl Catalog {
    /// Reads every document in the two directories.
    ///
    /// Documents are not validated here beyond parsing; a scraper that can't
    /// be prepared is still listed.
    #[instrument(level = "debug")]
    pub fn load(types: &Path, scrapers: &Path) -> Result<Self> {
        let mut catalog = Self::default();
        for path in document::list(types)? {
            catalog.add_type(document::read(&path)?)?;
        }
        for path in document::list(scrapers)? {
            catalog.add_scraper(document::read(&path)?)?;
        }
        tracing::debug!(types = catalog.types.len(), scrapers = catalog.scrapers.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn add_type(&mut self, media_type: MediaType) -> Result<()> {
        if self.types.contains_key(&media_type.name) {
            exn::bail!(ErrorKind::InvalidDocument(format!("duplicate media type {:?}", media_type.name)));
        }
        self.types.insert(media_type.name, media_type.defaults);
        Ok(())
    }

    pub fn add_scraper(&mut self, definition: ScraperDefinition) -> Result<()> {
        if self.scrapers.contains_key(&definition.name) {
            exn::bail!(ErrorKind::InvalidDocument(format!("duplicate scraper {:?}", definition.name)));
        }
        self.scrapers.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn scraper(&self, name: &str) -> Option<&ScraperDefinition> {
        self.scrapers.get(name)
    }

    /// Scraper definitions in name order.
    pub fn scrapers(&self) -> impl Iterator<Item = &ScraperDefinition> {
        self.scrapers.values()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
impl TypeRegistry for Catalog {
    fn defaults(&self, type_name: &str) -> Option<&Details> {
        self.types.get(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_engine::Value;
    use std::fs;

    const MOVIE: &str = "name: movie\ndefaults:\n  year: 0\n  genres: []\n";
    const NFO: &str = r#"
name = "nfo"
type = "movie"
filename = '(.*)\.mkv$'

[[procedures]]
source = "$0.nfo"
searchFor = 'Title: (.+)'
set = { name = "$1" }
"#;
    const TRAILER: &str = r#"{"name": "trailer", "type": "movie", "filename": "(.*)-trailer\\.mp4$"}"#;

    fn write_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("types")).unwrap();
        fs::create_dir(dir.path().join("scrapers")).unwrap();
        fs::write(dir.path().join("types/movie.yaml"), MOVIE).unwrap();
        fs::write(dir.path().join("scrapers/nfo.toml"), NFO).unwrap();
        fs::write(dir.path().join("scrapers/trailer.json"), TRAILER).unwrap();
        fs::write(dir.path().join("scrapers/README.md"), "not a definition").unwrap();
        dir
    }

    #[test]
    fn test_load_mixed_formats() {
        let dir = write_tree();
        let catalog = Catalog::load(&dir.path().join("types"), &dir.path().join("scrapers")).unwrap();

        let defaults = catalog.defaults("movie").unwrap();
        assert_eq!(defaults["year"], Value::from(0));
        assert_eq!(defaults["genres"], Value::Array(vec![]));
        assert_eq!(catalog.type_names().collect::<Vec<_>>(), vec!["movie"]);

        let names: Vec<_> = catalog.scrapers().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["nfo", "trailer"]);
        let nfo = catalog.scraper("nfo").unwrap();
        assert_eq!(nfo.file_name_pattern, r"(.*)\.mkv$");
        assert_eq!(nfo.procedures.len(), 1);
        assert!(nfo.validate().is_ok());
    }

    #[test]
    fn test_duplicate_scraper_names() {
        let dir = write_tree();
        fs::write(dir.path().join("scrapers/nfo-copy.json"), r#"{"name": "nfo", "type": "movie", "filename": ".*"}"#)
            .unwrap();
        let err = Catalog::load(&dir.path().join("types"), &dir.path().join("scrapers")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidDocument(message) if message.contains("duplicate scraper")));
    }

    #[test]
    fn test_unparseable_document() {
        let dir = write_tree();
        fs::write(dir.path().join("scrapers/broken.json"), r#"{"name": "broken"}"#).unwrap();
        let err = Catalog::load(&dir.path().join("types"), &dir.path().join("scrapers")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidDocument(path) if path.ends_with("broken.json")));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("types"), dir.path()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Directory(_)));
    }
}
