//! Backreference expansion for procedure templates.
//!
//! Templates refer to the capture groups of the active [`MatchContext`] with
//! `$0` through `$9`; `$$` is a literal dollar sign. Any other `$` is
//! malformed and is kept verbatim, so expansion always produces a string.
//!
//! Expanded values are inserted as-is. When a template is a search pattern,
//! captured text becomes part of the regular expression.

use crate::context::MatchContext;

/// The result of expanding a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    /// Byte offsets (into the template) of every malformed `$`.
    pub malformed: Vec<usize>,
}
impl Expansion {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}
impl From<Expansion> for String {
    fn from(expansion: Expansion) -> Self {
        expansion.text
    }
}

enum Token<'a> {
    Literal(&'a str),
    Dollar,
    Group(usize),
    Malformed(usize),
}

/// Splits a template into literal runs and `$` escapes, left to right.
fn tokens(template: &str) -> impl Iterator<Item = Token<'_>> {
    let mut rest = template;
    let mut offset = 0;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let (token, consumed) = match rest.find('$') {
            Some(0) => match rest[1..].chars().next() {
                Some('$') => (Token::Dollar, 2),
                Some(c @ '0'..='9') => (Token::Group(c as usize - '0' as usize), 2),
                // Advance past the `$` only; whatever follows is re-scanned.
                _ => (Token::Malformed(offset), 1),
            },
            Some(next) => (Token::Literal(&rest[..next]), next),
            None => (Token::Literal(rest), rest.len()),
        };
        rest = &rest[consumed..];
        offset += consumed;
        Some(token)
    })
}

/// Replaces every backreference in `template` with the matching capture
/// group from `context`. Absent groups expand to the empty string.
pub fn expand(template: &str, context: &MatchContext) -> Expansion {
    let mut text = String::with_capacity(template.len());
    let mut malformed = Vec::new();
    for token in tokens(template) {
        match token {
            Token::Literal(literal) => text.push_str(literal),
            Token::Dollar => text.push('$'),
            Token::Group(index) => text.push_str(context.get(index).unwrap_or_default()),
            Token::Malformed(offset) => {
                malformed.push(offset);
                text.push('$');
            },
        }
    }
    Expansion { text, malformed }
}

/// Highest capture group index referenced by `template`, if any.
pub fn highest_reference(template: &str) -> Option<usize> {
    tokens(template)
        .filter_map(|token| match token {
            Token::Group(index) => Some(index),
            _ => None,
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn context() -> MatchContext {
        MatchContext::new(vec![
            Some("movie.mkv".to_string()),
            Some("movie".to_string()),
            None,
            Some("2010".to_string()),
        ])
    }

    #[rstest]
    #[case("$0.nfo", "movie.mkv.nfo")]
    #[case("$1 ($3)", "movie (2010)")]
    #[case("no references", "no references")]
    #[case("", "")]
    #[case("$$1", "$1")]
    #[case("cost: $$$3", "cost: $2010")]
    #[case("$2", "")]
    #[case("$9", "")]
    #[case("$1$1", "moviemovie")]
    #[case("é$1ü", "émovieü")]
    fn test_expand(#[case] template: &str, #[case] expected: &str) {
        let expansion = expand(template, &context());
        assert_eq!(expansion.text, expected);
        assert!(expansion.is_clean());
    }

    #[rstest]
    #[case("Hello $x", "Hello $x", vec![6])]
    #[case("trailing $", "trailing $", vec![9])]
    #[case("$", "$", vec![0])]
    #[case("$é$1", "$émovie", vec![0])]
    #[case("$ $ $1", "$ $ movie", vec![0, 2])]
    fn test_expand_malformed(#[case] template: &str, #[case] expected: &str, #[case] offsets: Vec<usize>) {
        let expansion = expand(template, &context());
        assert_eq!(expansion.text, expected);
        assert_eq!(expansion.malformed, offsets);
    }

    #[test]
    fn test_expand_is_deterministic() {
        let first = expand("$1 - $3 - $$ - $z", &context());
        let second = expand("$1 - $3 - $$ - $z", &context());
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("$0.nfo", Some(0))]
    #[case("$1/$3/$2", Some(3))]
    #[case("$$9", None)]
    #[case("$x", None)]
    #[case("plain", None)]
    fn test_highest_reference(#[case] template: &str, #[case] expected: Option<usize>) {
        assert_eq!(highest_reference(template), expected);
    }
}
