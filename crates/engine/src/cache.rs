//! Per-item memo of source contents and compiled search patterns.

use regex::Regex;
use sift_source::SourceReader;
use sift_source::error::Result as SourceResult;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// Memoizes source reads by their resolved reference for the duration of a
/// single item's scrape.
///
/// Failed reads are never stored, so an unreadable source can't later pass
/// for an empty one. Compiled search patterns are kept alongside, keyed by
/// their expanded text.
#[derive(Debug, Default)]
pub struct SourceCache {
    contents: HashMap<String, Arc<str>>,
    patterns: HashMap<String, Regex>,
}
impl SourceCache {
    /// Returns the content behind `reference`, reading it on first use.
    pub fn resolve(&mut self, reader: &dyn SourceReader, reference: &str) -> SourceResult<Arc<str>> {
        match self.contents.entry(reference.to_string()) {
            Entry::Occupied(entry) => {
                tracing::debug!(reference, "source cache hit");
                Ok(Arc::clone(entry.get()))
            },
            Entry::Vacant(entry) => {
                tracing::debug!(reference, reader = reader.name(), "source cache miss");
                let content: Arc<str> = reader.read(reference)?.into();
                Ok(Arc::clone(entry.insert(content)))
            },
        }
    }

    /// Compiles `pattern`, reusing an earlier compilation of the same text.
    pub fn pattern(&mut self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Some(regex) = self.patterns.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(pattern)?;
        self.patterns.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    pub fn is_cached(&self, reference: &str) -> bool {
        self.contents.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Drops everything held, releasing the memory.
    pub fn clear(&mut self) {
        self.contents = HashMap::new();
        self.patterns = HashMap::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_source::MockReader;

    #[test]
    fn test_reads_once_per_reference() {
        let reader = MockReader::with_files([("a.nfo", "A"), ("b.nfo", "B")]);
        let mut cache = SourceCache::default();
        assert_eq!(&*cache.resolve(&reader, "a.nfo").unwrap(), "A");
        assert_eq!(&*cache.resolve(&reader, "a.nfo").unwrap(), "A");
        assert_eq!(&*cache.resolve(&reader, "b.nfo").unwrap(), "B");
        assert_eq!(reader.reads("a.nfo"), 1);
        assert_eq!(reader.reads("b.nfo"), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let reader = MockReader::with_files([("a.nfo", "")]);
        let mut cache = SourceCache::default();
        assert!(cache.resolve(&reader, "missing.nfo").is_err());
        assert!(cache.resolve(&reader, "missing.nfo").is_err());
        assert!(!cache.is_cached("missing.nfo"));
        assert_eq!(reader.reads("missing.nfo"), 2);
        // A genuinely empty file is cached content.
        assert_eq!(&*cache.resolve(&reader, "a.nfo").unwrap(), "");
        assert!(cache.is_cached("a.nfo"));
    }

    #[test]
    fn test_clear_forces_reread() {
        let reader = MockReader::with_files([("a.nfo", "A")]);
        let mut cache = SourceCache::default();
        cache.resolve(&reader, "a.nfo").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.resolve(&reader, "a.nfo").unwrap();
        assert_eq!(reader.reads("a.nfo"), 2);
    }

    #[test]
    fn test_pattern_compile_errors() {
        let mut cache = SourceCache::default();
        assert!(cache.pattern("Title: (.+)").is_ok());
        assert!(cache.pattern("Title: (.+").is_err());
    }
}
