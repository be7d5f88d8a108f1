//! The metadata record a scrape writes into.

use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Detail key → value map, also used for a media type's declared defaults.
pub type Details = BTreeMap<String, Value>;

/// The mutable target of a scrape.
///
/// The engine never creates or destroys records; the caller owns their whole
/// lifecycle and decides how they are persisted.
pub trait MetadataRecord {
    /// Where the media item lives. Matched against a scraper's file-name
    /// pattern and preserved across [`reset`](Self::reset).
    fn location(&self) -> &str;

    /// Restore every field to the media type's defaults, keeping only the
    /// location.
    fn reset(&mut self, defaults: &Details);

    fn set_name(&mut self, name: String);

    fn set_description(&mut self, description: String);

    /// The current value of a detail, `None` when absent.
    fn detail(&self, key: &str) -> Option<&Value>;

    /// Store a detail value. Coercion has already happened by the time this
    /// is called.
    fn set_detail(&mut self, key: &str, value: Value);

    /// Add an icon image; `import` asks for a copy rather than a link.
    fn add_icon(&mut self, reference: String, import: bool);

    /// Add a fanart image; `import` asks for a copy rather than a link.
    fn add_fanart(&mut self, reference: String, import: bool);
}

/// An image reference attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub reference: String,
    pub import: bool,
}

/// In-memory [`MetadataRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub details: Details,
    pub icons: Vec<Image>,
    pub fanart: Vec<Image>,
}
impl Record {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }
}
impl MetadataRecord for Record {
    fn location(&self) -> &str {
        &self.location
    }

    fn reset(&mut self, defaults: &Details) {
        *self = Self {
            location: std::mem::take(&mut self.location),
            details: defaults.clone(),
            ..Self::default()
        };
    }

    fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    fn set_detail(&mut self, key: &str, value: Value) {
        self.details.insert(key.to_string(), value);
    }

    fn add_icon(&mut self, reference: String, import: bool) {
        self.icons.push(Image { reference, import });
    }

    fn add_fanart(&mut self, reference: String, import: bool) {
        self.fanart.push(Image { reference, import });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_only_location() {
        let mut record = Record::new("movie.mkv");
        record.set_name("Old".to_string());
        record.set_detail("stale", Value::from(true));
        record.add_icon("old.png".to_string(), false);

        let defaults = Details::from([("year".to_string(), Value::from(0))]);
        record.reset(&defaults);

        assert_eq!(record, Record::new("movie.mkv").with_details(defaults));
    }

    #[test]
    fn test_serializes_without_empty_name() {
        let record = Record::new("a.mkv");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"location":"a.mkv","details":{},"icons":[],"fanart":[]}"#);
    }
}
