//! Cloze deletion pipeline.
//!
//! Each rule is a function `&str -> Option<String>` that wraps at most one span
//! and leaves the input alone when it has nothing to do. The rules for a
//! concept kind run in a fixed order; the capitalized-word fallback only runs
//! when no rule produced a deletion.

use std::sync::LazyLock;

use regex::Regex;

use deckwright_shared::{CardPayload, ConceptKind};

/// A single rewrite step; `None` means the rule did not fire.
type ClozeRule = fn(&str) -> Option<String>;

const FACT_RULES: &[ClozeRule] = &[wrap_year, wrap_percentage, wrap_quantity];
const LIST_ITEM_RULES: &[ClozeRule] = &[wrap_longest_word];
const FORMULA_RULES: &[ClozeRule] = &[wrap_formula_result];

/// List words must be longer than this to be hidden.
const MIN_HIDDEN_WORD_CHARS: usize = 4;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// An existing `{{cN::...}}` deletion.
static CLOZE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{c\d+::.*?\}\}").expect("cloze span regex"));

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("year regex"));

static PERCENTAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+%").expect("percentage regex"));

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+\s*(?:km|kg|cm|m)\b|\b\d+\s*[€$]").expect("quantity regex")
});

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("word regex"));

/// Capitalized word of at least four letters.
static CAPITALIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]{3,}\b").expect("capitalized word regex"));

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Render `text` as a cloze card using the rules for `kind`.
pub fn render_cloze(kind: ConceptKind, text: &str) -> CardPayload {
    CardPayload::cloze(cloze_text(kind, text))
}

/// Apply the deletion rules for `kind` to `text`.
///
/// The result may carry no deletion at all when nothing in the text qualifies.
pub fn cloze_text(kind: ConceptKind, text: &str) -> String {
    let mut result = text.to_string();

    for rule in rules_for(kind) {
        if let Some(next) = rule(&result) {
            result = next;
        }
    }

    if !has_deletion(&result) {
        if let Some(next) = wrap_capitalized(&result) {
            result = next;
        }
    }

    result
}

fn rules_for(kind: ConceptKind) -> &'static [ClozeRule] {
    match kind {
        ConceptKind::Fact => FACT_RULES,
        ConceptKind::ListItem => LIST_ITEM_RULES,
        ConceptKind::Formula => FORMULA_RULES,
        ConceptKind::Definition => &[],
    }
}

/// Whether `text` already holds a `{{c` marker.
pub fn has_deletion(text: &str) -> bool {
    text.contains("{{c")
}

/// Wrap `text[start..end]` as deletion number `n`.
pub(crate) fn wrap_range(text: &str, start: usize, end: usize, n: u32) -> String {
    format!(
        "{}{{{{c{n}::{}}}}}{}",
        &text[..start],
        &text[start..end],
        &text[end..]
    )
}

/// Wrap the first match of `re` that does not overlap an existing deletion.
pub(crate) fn wrap_first(text: &str, re: &Regex, n: u32) -> Option<String> {
    let spans: Vec<(usize, usize)> = CLOZE_SPAN_RE
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let m = re.find_iter(text).find(|m| {
        !spans
            .iter()
            .any(|&(start, end)| m.start() < end && start < m.end())
    })?;

    Some(wrap_range(text, m.start(), m.end(), n))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn wrap_year(text: &str) -> Option<String> {
    wrap_first(text, &YEAR_RE, 1)
}

fn wrap_percentage(text: &str) -> Option<String> {
    wrap_first(text, &PERCENTAGE_RE, 2)
}

fn wrap_quantity(text: &str) -> Option<String> {
    wrap_first(text, &QUANTITY_RE, 3)
}

/// Hide the longest purely alphabetic word; the first one wins a tie.
fn wrap_longest_word(text: &str) -> Option<String> {
    let mut longest: Option<(usize, usize, usize)> = None;
    for m in WORD_RE.find_iter(text) {
        let word = m.as_str();
        let len = word.chars().count();
        if len > MIN_HIDDEN_WORD_CHARS
            && word.chars().all(char::is_alphabetic)
            && longest.is_none_or(|(_, _, best)| len > best)
        {
            longest = Some((m.start(), m.end(), len));
        }
    }

    let (start, end, _) = longest?;
    Some(wrap_range(text, start, end, 1))
}

/// `lhs = rhs` becomes `lhs = {{c1::rhs}}`.
fn wrap_formula_result(text: &str) -> Option<String> {
    let (lhs, rhs) = text.split_once('=')?;
    let rhs = rhs.trim();
    if rhs.is_empty() {
        return None;
    }
    Some(format!("{lhs}= {{{{c1::{rhs}}}}}"))
}

fn wrap_capitalized(text: &str) -> Option<String> {
    wrap_first(text, &CAPITALIZED_RE, 1)
}
