//! Scraper definitions, as read from a definition document.

use crate::error::{ErrorKind, Result};
use crate::procedure::ProcedureNode;
use exn::ResultExt;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::instrument;

/// A complete extraction rule set for one media type.
///
/// ```
/// use sift_engine::{ProcedureNode, ScraperDefinition};
///
/// let definition = ScraperDefinition::new("nfo", "movie", r"(.*)\.mkv$")
///     .procedure(ProcedureNode::new("$0.nfo", "Title: (.+)").set("name", "$1"));
/// assert!(definition.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperDefinition {
    pub name: String,
    /// The media type whose records this scraper fills in.
    #[serde(rename = "type")]
    pub target_type: String,
    /// Matched against an item's location to produce the seed context.
    #[serde(rename = "filename")]
    pub file_name_pattern: String,
    /// Every file-name match is a separate item, rather than only the first.
    #[serde(default)]
    pub multiple_items_per_file: bool,
    /// Detail key → parent detail key, copied from a containing record when
    /// inheritance is enabled.
    #[serde(default)]
    pub inherited_metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub procedures: Vec<ProcedureNode>,
}
impl ScraperDefinition {
    pub fn new(name: impl Into<String>, target_type: impl Into<String>, file_name_pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            file_name_pattern: file_name_pattern.into(),
            multiple_items_per_file: false,
            inherited_metadata: BTreeMap::new(),
            procedures: Vec::new(),
        }
    }

    pub fn procedure(mut self, procedure: ProcedureNode) -> Self {
        self.procedures.push(procedure);
        self
    }

    pub fn multiple_items_per_file(mut self, multiple: bool) -> Self {
        self.multiple_items_per_file = multiple;
        self
    }

    pub fn inherit(mut self, key: impl Into<String>, parent_key: impl Into<String>) -> Self {
        self.inherited_metadata.insert(key.into(), parent_key.into());
        self
    }

    /// Compiles the file-name pattern and checks the shape of every
    /// procedure, returning the compiled pattern.
    #[instrument(level = "debug", skip(self), fields(scraper = %self.name))]
    pub fn validate(&self) -> Result<Regex> {
        let file_name = Regex::new(&self.file_name_pattern)
            .or_raise(|| ErrorKind::InvalidPattern(self.file_name_pattern.clone()))?;
        let bound = Some(file_name.captures_len() - 1);
        for (i, procedure) in self.procedures.iter().enumerate() {
            procedure.validate(bound, &format!("procedures[{i}]"))?;
        }
        Ok(file_name)
    }
}
