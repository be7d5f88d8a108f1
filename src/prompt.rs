//! Terminal prompting for ambiguous matches.

use sift_engine::{MatchContext, PromptRequest, Prompter};
use std::io::{self, BufRead, Write};

/// Lists the candidates on stderr and reads the operator's choice from
/// stdin. An empty answer keeps the default selection.
pub struct TerminalPrompter;
impl Prompter for TerminalPrompter {
    fn choose(&self, request: &PromptRequest<'_>) -> Option<Vec<MatchContext>> {
        if let Err(err) = show(request) {
            tracing::warn!(%err, "could not show candidates, using default selection");
            return None;
        }

        let mut answer = String::new();
        if let Err(err) = io::stdin().lock().read_line(&mut answer) {
            tracing::warn!(%err, "could not read answer");
            return None;
        }
        let Some(indices) = parse_answer(&answer, request.candidates.len(), request.repeat) else {
            tracing::warn!(answer = answer.trim(), "unrecognised answer, using default selection");
            return None;
        };
        if indices.is_empty() {
            return None;
        }
        Some(indices.into_iter().map(|i| request.candidates[i].clone()).collect())
    }
}

fn show(request: &PromptRequest<'_>) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "[{}] {} matches for {:?} in {}:", request.scraper, request.candidates.len(), request.pattern, request.source)?;
    for (i, candidate) in request.candidates.iter().enumerate() {
        writeln!(stderr, "  {}) {}{}", i + 1, candidate.whole(), groups(candidate))?;
    }
    let hint = if request.repeat { "numbers, comma separated" } else { "number" };
    write!(stderr, "choose ({hint}, empty for default): ")?;
    stderr.flush()
}

/// The captured groups after the whole match, as `  [a, b]`.
fn groups(candidate: &MatchContext) -> String {
    let groups: Vec<_> = candidate.iter().skip(1).map(Option::unwrap_or_default).collect();
    if groups.is_empty() { String::new() } else { format!("  [{}]", groups.join(", ")) }
}

/// One-based, comma or space separated choices as zero-based indices.
/// `None` when any choice is not a number in range, or when several are
/// given but only one may be picked.
fn parse_answer(answer: &str, count: usize, repeat: bool) -> Option<Vec<usize>> {
    let indices = answer
        .split([',', ' '])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Some(n - 1),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    (repeat || indices.len() <= 1).then_some(indices)
}
