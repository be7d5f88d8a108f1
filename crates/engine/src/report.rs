use crate::value::ValueKind;
use derive_more::Display;

/// A non-fatal problem encountered during a scrape.
///
/// None of these abort the scrape. Node-level failures make the outcome
/// [`Incomplete`](Outcome::Incomplete); the rest only skip a single write.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A `$` not followed by a digit or another `$`; left verbatim.
    #[display("malformed backreference at offset {offset} in {template:?}")]
    MalformedBackreference { template: String, offset: usize },
    /// The resolved source could not be read.
    #[display("could not read {reference}: {reason}")]
    Unreadable { reference: String, reason: String },
    /// The expanded search pattern does not compile.
    #[display("invalid search pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    /// The search pattern found nothing in the source.
    #[display("no matches for {pattern:?} in {reference}")]
    NoMatches { pattern: String, reference: String },
    /// A value could not be converted to the type of the field it targets.
    #[display("cannot set {field}: expected {expected}, found {found}")]
    CoercionRejected {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },
}
impl Warning {
    /// Returns `true` for warnings that mark a procedure as failed.
    pub fn is_node_failure(&self) -> bool {
        matches!(self, Self::Unreadable { .. } | Self::InvalidPattern { .. } | Self::NoMatches { .. })
    }
}

/// How a scrape of a single item ended.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every procedure matched.
    #[display("complete")]
    Complete,
    /// At least one procedure failed; the record may still be partially
    /// populated and the caller should surface a warning.
    #[display("incomplete")]
    Incomplete,
    /// The item's location does not match the scraper's file-name pattern.
    /// Try another scraper.
    #[display("no match")]
    Mismatch,
}

/// The result of scraping one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub warnings: Vec<Warning>,
}
impl Report {
    pub(crate) fn new(complete: bool, warnings: Vec<Warning>) -> Self {
        let outcome = if complete { Outcome::Complete } else { Outcome::Incomplete };
        Self { outcome, warnings }
    }

    pub(crate) fn mismatch() -> Self {
        Self {
            outcome: Outcome::Mismatch,
            warnings: Vec::new(),
        }
    }

    /// The single "fully complete" signal: `true` only when the item matched
    /// and every procedure succeeded.
    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Complete
    }

    pub fn is_match(&self) -> bool {
        self.outcome != Outcome::Mismatch
    }
}
impl From<&Report> for bool {
    fn from(report: &Report) -> Self {
        report.is_complete()
    }
}
