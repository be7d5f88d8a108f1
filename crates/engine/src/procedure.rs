//! Procedure nodes: one rule of a scraper's extraction tree.

use crate::backref::{self, highest_reference};
use crate::context::MatchContext;
use crate::error::{ErrorKind, Result};
use crate::value::Value;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Which part of a record an assignment writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Description,
    Detail(String),
    Icon,
    Fanart,
}
impl From<String> for Field {
    fn from(key: String) -> Self {
        match key.as_str() {
            "name" => Self::Name,
            "description" => Self::Description,
            "icon" => Self::Icon,
            "fanart" => Self::Fanart,
            _ => Self::Detail(key),
        }
    }
}
impl From<&str> for Field {
    fn from(key: &str) -> Self {
        Self::from(key.to_string())
    }
}
impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Name => f.write_str("name"),
            Self::Description => f.write_str("description"),
            Self::Detail(key) => f.write_str(key),
            Self::Icon => f.write_str("icon"),
            Self::Fanart => f.write_str("fanart"),
        }
    }
}

/// A single field write. String values are templates and may contain
/// backreferences; other values are written as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub field: Field,
    pub value: Value,
}

/// One rule: where to look, what to look for, what to write, and which rules
/// to run inside each match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureNode {
    /// File path or URL template of the text to search.
    pub source: String,
    /// Regular expression template searched for in the source.
    pub search_for: String,
    /// Keep every non-overlapping match instead of only the first.
    #[serde(default)]
    pub repeat: bool,
    /// Let an operator choose the matches, when prompting is enabled.
    #[serde(default)]
    pub ask_user: bool,
    /// Always import icon/fanart images, regardless of the scrape options.
    #[serde(default)]
    pub import: bool,
    #[serde(default, rename = "set", deserialize_with = "assignments")]
    pub assignments: Vec<Assignment>,
    #[serde(default, rename = "procedures")]
    pub children: Vec<ProcedureNode>,
}

/// `set` is a map of field name to value; keys other than `name`,
/// `description`, `icon` and `fanart` are detail keys.
fn assignments<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<Assignment>, D::Error> {
    let map = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(map
        .into_iter()
        .map(|(key, value)| Assignment {
            field: key.into(),
            value,
        })
        .collect())
}

impl ProcedureNode {
    pub fn new(source: impl Into<String>, search_for: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            search_for: search_for.into(),
            repeat: false,
            ask_user: false,
            import: false,
            assignments: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn ask_user(mut self, ask_user: bool) -> Self {
        self.ask_user = ask_user;
        self
    }

    pub fn import(mut self, import: bool) -> Self {
        self.import = import;
        self
    }

    pub fn set(mut self, field: impl Into<Field>, value: impl Into<Value>) -> Self {
        self.assignments.push(Assignment {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn child(mut self, child: ProcedureNode) -> Self {
        self.children.push(child);
        self
    }

    /// Checks the shape of this node and its subtree.
    ///
    /// `bound` is the highest capture group the parent match can supply, or
    /// `None` when it can't be known before execution. The node's own bound
    /// comes from compiling its search pattern with every backreference
    /// expanded to nothing; when that doesn't compile the pattern depends on
    /// captured text and the check is left to execution time.
    pub(crate) fn validate(&self, bound: Option<usize>, path: &str) -> Result<()> {
        for (name, template) in [("source", &self.source), ("searchFor", &self.search_for)] {
            if template.trim().is_empty() {
                exn::bail!(ErrorKind::InvalidDefinition(format!("{path}: empty {name}")));
            }
            check_references(template, bound, path, name)?;
        }
        let own = static_bound(&self.search_for);
        for assignment in &self.assignments {
            if let Value::String(template) = &assignment.value {
                check_references(template, own, path, &assignment.field.to_string())?;
            }
        }
        for (i, child) in self.children.iter().enumerate() {
            child.validate(own, &format!("{path}.procedures[{i}]"))?;
        }
        Ok(())
    }
}

fn check_references(template: &str, bound: Option<usize>, path: &str, name: &str) -> Result<()> {
    if let (Some(bound), Some(highest)) = (bound, highest_reference(template))
        && highest > bound
    {
        exn::bail!(ErrorKind::InvalidDefinition(format!(
            "{path}: {name} references ${highest} but only {bound} capture group(s) are available"
        )));
    }
    Ok(())
}

/// Highest capture group a pattern template can produce, if it compiles
/// without knowing its backreferences.
fn static_bound(template: &str) -> Option<usize> {
    let pattern = backref::expand(template, &MatchContext::default()).text;
    Regex::new(&pattern).ok().map(|regex| regex.captures_len() - 1)
}
