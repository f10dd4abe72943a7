//! Front/back rendering of concepts.

use std::sync::LazyLock;

use regex::Regex;

use deckwright_shared::CardPayload;

/// Characters of concept text quoted on a fallback front.
const FALLBACK_FRONT_CHARS: usize = 80;

/// `<term> est|is ... <rest>`. Unlike the definition detector, the term length
/// is unbounded.
static COPULA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:est|est un|est une|is|is a|is an)\s+(.+)$")
        .expect("copula regex")
});

/// Render `text` as a question/answer pair.
///
/// Definitions become `Qu'est-ce que <term> ?`; anything else falls back to an
/// `Expliquez:` prompt quoting the start of the text.
pub fn render_basic(text: &str) -> CardPayload {
    match split_copula(text) {
        Some((term, rest)) => {
            CardPayload::basic(format!("Qu'est-ce que {term} ?"), capitalize(rest))
        }
        None => {
            let excerpt: String = text.chars().take(FALLBACK_FRONT_CHARS).collect();
            CardPayload::basic(format!("Expliquez: {excerpt}"), text)
        }
    }
}

fn split_copula(text: &str) -> Option<(&str, &str)> {
    let caps = COPULA_RE.captures(text)?;
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
}

/// Upper-case the first character and lower-case the rest.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
