//! Cloze cards that hide chosen terms.
//!
//! Every term yields its own card, hiding the first occurrence of the term in
//! the text. Terms come from the caller or, when none are given, from
//! [`detect_cloze_terms`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use deckwright_shared::CardPayload;

use crate::cloze::wrap_range;

/// Detected terms considered before the length filter.
pub const MAX_DETECTED_TERMS: usize = 5;

/// Detected terms shorter than this are not hidden.
const MIN_DETECTED_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Run of capitalized words: `Guido`, `New York`.
static PROPER_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("proper noun regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("year regex"));

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?%?\b").expect("number regex"));

static DOUBLE_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("double quoted regex"));

static SINGLE_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']+)'").expect("single quoted regex"));

/// A cloze card and the term it hides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenTermCard {
    pub card: CardPayload,
    pub hidden_term: String,
}

/// One card per hint found in `text`; hint `i` (1-based) becomes `{{ci::...}}`.
///
/// Hints missing from the text are skipped but keep their number.
pub fn cloze_from_hints<S: AsRef<str>>(text: &str, hints: &[S]) -> Vec<HiddenTermCard> {
    hints
        .iter()
        .enumerate()
        .filter_map(|(i, hint)| hide_term(text, hint.as_ref(), i + 1))
        .collect()
}

/// One card per detected term, numbered consecutively.
pub fn cloze_from_detected_terms(text: &str) -> Vec<HiddenTermCard> {
    detect_cloze_terms(text)
        .into_iter()
        .enumerate()
        .filter_map(|(i, term)| hide_term(text, term, i + 1))
        .collect()
}

/// Proper nouns, years, numbers, then quoted terms, deduplicated in discovery
/// order. Only the first [`MAX_DETECTED_TERMS`] are considered, and those
/// shorter than three characters are dropped.
pub fn detect_cloze_terms(text: &str) -> Vec<&str> {
    let found = PROPER_NOUN_RE
        .find_iter(text)
        .chain(YEAR_RE.find_iter(text))
        .chain(NUMBER_RE.find_iter(text))
        .map(|m| m.as_str())
        .chain(quoted(&DOUBLE_QUOTED_RE, text))
        .chain(quoted(&SINGLE_QUOTED_RE, text));

    let mut terms: Vec<&str> = Vec::new();
    for term in found {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms.truncate(MAX_DETECTED_TERMS);
    terms.retain(|term| term.chars().count() >= MIN_DETECTED_CHARS);
    terms
}

/// Inner text of every quoted span matched by `re`.
fn quoted<'t>(re: &'static Regex, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn hide_term(text: &str, term: &str, n: usize) -> Option<HiddenTermCard> {
    if term.is_empty() {
        return None;
    }
    let start = text.find(term)?;
    let n = u32::try_from(n).ok()?;
    Some(HiddenTermCard {
        card: CardPayload::cloze(wrap_range(text, start, start + term.len(), n)),
        hidden_term: term.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckwright_shared::CardContent;

    const TEXT: &str = "Python was created by Guido van Rossum in 1991.";

    fn texts(cards: &[HiddenTermCard]) -> Vec<&str> {
        cards
            .iter()
            .map(|c| match &c.card.content {
                CardContent::Cloze { text } => text.as_str(),
                CardContent::Basic { .. } => panic!("expected a cloze card"),
            })
            .collect()
    }

    #[test]
    fn hints_are_numbered_by_position() {
        let cards = cloze_from_hints(TEXT, &["Python", "Java", "1991"]);
        assert_eq!(
            texts(&cards),
            vec![
                "{{c1::Python}} was created by Guido van Rossum in 1991.",
                "Python was created by Guido van Rossum in {{c3::1991}}.",
            ]
        );
        assert_eq!(cards[1].hidden_term, "1991");
    }

    #[test]
    fn only_first_occurrence_is_hidden() {
        let cards = cloze_from_hints("a cat and a cat", &["cat", ""]);
        assert_eq!(texts(&cards), vec!["a {{c1::cat}} and a cat"]);
    }

    #[test]
    fn detection_order_and_filters() {
        assert_eq!(detect_cloze_terms(TEXT), vec!["Python", "Guido", "Rossum", "1991"]);
        assert_eq!(
            detect_cloze_terms("The keyword 'async' marks a \"coroutine\""),
            vec!["The", "coroutine", "async"]
        );
        // "He" and "3" are too short to hide.
        assert!(detect_cloze_terms("He bought 3 apples").is_empty());
    }

    #[test]
    fn detected_terms_are_numbered_consecutively() {
        let cards = cloze_from_detected_terms(TEXT);
        assert_eq!(cards.len(), 4);
        assert_eq!(
            texts(&cards)[3],
            "Python was created by Guido van Rossum in {{c4::1991}}."
        );
    }
}
