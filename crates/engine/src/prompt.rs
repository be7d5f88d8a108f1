use crate::context::MatchContext;

/// What the engine asks an operator to choose between.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    /// Name of the scraper doing the asking.
    pub scraper: &'a str,
    /// The resolved source reference (or the item location, when choosing
    /// between file-name matches).
    pub source: &'a str,
    /// The expanded pattern that produced the candidates.
    pub pattern: &'a str,
    /// Every match, in order of appearance.
    pub candidates: &'a [MatchContext],
    /// Whether the procedure would normally keep every match.
    pub repeat: bool,
}

/// Lets an operator pick matches instead of the mechanical first/all rule.
///
/// Only consulted for procedures flagged `askUser` (and for ambiguous
/// file-name matches) when the scrape options enable prompting.
pub trait Prompter {
    /// Returns the chosen contexts, or `None` to fall back to mechanical
    /// selection. Returning an empty list makes the procedure fail.
    fn choose(&self, request: &PromptRequest<'_>) -> Option<Vec<MatchContext>>;
}
impl<F> Prompter for F
where
    F: Fn(&PromptRequest<'_>) -> Option<Vec<MatchContext>>,
{
    fn choose(&self, request: &PromptRequest<'_>) -> Option<Vec<MatchContext>> {
        self(request)
    }
}
