//! Recursive evaluation of a procedure tree against one record.

use crate::cache::SourceCache;
use crate::context::MatchContext;
use crate::procedure::ProcedureNode;
use crate::prompt::{PromptRequest, Prompter};
use crate::record::MetadataRecord;
use crate::report::Warning;
use crate::setter::{self, Inheritance, Setter};
use regex::Regex;
use sift_source::SourceReader;
use tracing::instrument;

/// Walks procedure nodes for a single item.
///
/// Holds no per-item state besides the warnings it has collected; the
/// record is passed down explicitly through every call.
pub(crate) struct Executor<'a> {
    pub scraper: &'a str,
    pub reader: &'a dyn SourceReader,
    pub cache: &'a mut SourceCache,
    /// Only set when prompting is enabled for this scrape.
    pub prompter: Option<&'a dyn Prompter>,
    pub import: bool,
    pub inheritance: Option<Inheritance<'a>>,
    pub warnings: Vec<Warning>,
}
impl Executor<'_> {
    /// Evaluates every node against `context`. All siblings run even after
    /// one of them fails; the result is `true` only if all succeeded.
    pub fn run(&mut self, nodes: &[ProcedureNode], context: &MatchContext, record: &mut dyn MetadataRecord) -> bool {
        let mut complete = true;
        for node in nodes {
            complete &= self.evaluate(node, context, record);
        }
        complete
    }

    #[instrument(level = "trace", skip_all, fields(source = %node.source, search_for = %node.search_for))]
    fn evaluate(&mut self, node: &ProcedureNode, context: &MatchContext, record: &mut dyn MetadataRecord) -> bool {
        let reference = setter::expand(&node.source, context, &mut self.warnings);
        let text = match self.cache.resolve(self.reader, &reference) {
            Ok(text) => text,
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(reference, reason, "source unreadable");
                self.warnings.push(Warning::Unreadable { reference, reason });
                return false;
            },
        };

        let pattern = setter::expand(&node.search_for, context, &mut self.warnings);
        let regex = match self.cache.pattern(&pattern) {
            Ok(regex) => regex,
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(pattern, reason, "search pattern does not compile");
                self.warnings.push(Warning::InvalidPattern { pattern, reason });
                return false;
            },
        };

        let matches = self.select(node, &reference, &pattern, &regex, &text);
        if matches.is_empty() {
            tracing::warn!(pattern, reference, "no matches");
            self.warnings.push(Warning::NoMatches { pattern, reference });
            return false;
        }
        tracing::trace!(count = matches.len(), "matched");

        let setter = Setter {
            import: self.import || node.import,
            inheritance: self.inheritance,
        };
        let mut complete = true;
        for context in &matches {
            setter.apply(&node.assignments, context, record, &mut self.warnings);
            complete &= self.run(&node.children, context, record);
        }
        complete
    }

    /// First match, or every match for `repeat` nodes. Nodes asking for an
    /// operator gather every match and let the prompter decide; a
    /// non-repeating node still keeps at most one of the chosen matches.
    fn select(
        &self,
        node: &ProcedureNode,
        reference: &str,
        pattern: &str,
        regex: &Regex,
        text: &str,
    ) -> Vec<MatchContext> {
        let prompter = self.prompter.filter(|_| node.ask_user);
        if !node.repeat && prompter.is_none() {
            return MatchContext::first(regex, text).into_iter().collect();
        }
        let mut candidates = MatchContext::all(regex, text);
        if let Some(prompter) = prompter
            && !candidates.is_empty()
        {
            let request = PromptRequest {
                scraper: self.scraper,
                source: reference,
                pattern,
                candidates: &candidates,
                repeat: node.repeat,
            };
            if let Some(mut chosen) = prompter.choose(&request) {
                tracing::debug!(chosen = chosen.len(), "operator chose matches");
                if !node.repeat {
                    chosen.truncate(1);
                }
                return chosen;
            }
        }
        if !node.repeat {
            candidates.truncate(1);
        }
        candidates
    }
}
