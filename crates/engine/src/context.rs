use regex::{Captures, Regex};

/// Immutable snapshot of the capture groups from one regular-expression
/// match.
///
/// Index `0` is the whole match; groups that did not participate in the
/// match are absent. A procedure never mutates the context it was given, it
/// only derives fresh contexts for its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchContext {
    groups: Vec<Option<String>>,
}
impl MatchContext {
    pub fn new(groups: Vec<Option<String>>) -> Self {
        Self { groups }
    }

    pub fn from_captures(captures: &Captures<'_>) -> Self {
        Self {
            groups: captures.iter().map(|group| group.map(|m| m.as_str().to_string())).collect(),
        }
    }

    /// The first match of `regex` in `text`, if any.
    pub fn first(regex: &Regex, text: &str) -> Option<Self> {
        regex.captures(text).map(|captures| Self::from_captures(&captures))
    }

    /// Every non-overlapping match of `regex` in `text`, in order of
    /// appearance.
    pub fn all(regex: &Regex, text: &str) -> Vec<Self> {
        regex.captures_iter(text).map(|captures| Self::from_captures(&captures)).collect()
    }

    /// Capture group `index`, or `None` when it is absent or out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(Option::as_deref)
    }

    /// The whole match (group `0`), empty for the default context.
    pub fn whole(&self) -> &str {
        self.get(0).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.groups.iter().map(Option::as_deref)
    }
}
impl From<Captures<'_>> for MatchContext {
    fn from(captures: Captures<'_>) -> Self {
        Self::from_captures(&captures)
    }
}
