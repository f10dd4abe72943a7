//! Concept candidate extraction from free prose.
//!
//! Each surviving line runs through every detector in [`DETECTORS`]; a line
//! may yield several concepts (a definition that also carries a date is both a
//! definition and a fact).

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use deckwright_shared::{ConceptIndicator, ConceptKind};

use crate::segment::{SourceLine, source_lines};

/// Default cap on returned concepts.
pub const DEFAULT_MAX_CONCEPTS: usize = 100;

/// Lines outside this character range are never inspected.
const MIN_LINE_CHARS: usize = 10;
const MAX_LINE_CHARS: usize = 300;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// `<term> est|is ... <rest>`, French or English copula.
static DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.{3,50}?)\s+(?:est|est un|est une|is|is a|is an)\s+(.+)$")
        .expect("definition regex")
});

/// A year, a percentage, or a number with a unit.
static FACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{4}\b|\b\d+%|\b\d+\s*(?:km|kg|cm|m)\b|\b\d+\s*[€$]")
        .expect("fact regex")
});

/// Bullet (`-`, `•`, `*`) or numbered (`1.`, `1)`) list marker.
static LIST_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-•*]|\d+[.)])\s+").expect("list marker regex")
});

// ---------------------------------------------------------------------------
// Definition splitting
// ---------------------------------------------------------------------------

/// A `term est/is rest` split of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition<'a> {
    pub term: &'a str,
    pub rest: &'a str,
}

/// Split a line on its first copula, without the detector's length guards.
pub fn split_definition(text: &str) -> Option<Definition<'_>> {
    let caps = DEFINITION_RE.captures(text)?;
    let term = caps.get(1)?.as_str().trim();
    let rest = caps.get(2)?.as_str().trim();
    Some(Definition { term, rest })
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

/// Pure line detector: yields a concept or nothing.
pub type Detector = fn(&SourceLine<'_>) -> Option<ConceptIndicator>;

/// Applied in order to every line; all matches are kept.
pub const DETECTORS: &[Detector] = &[detect_definition, detect_fact, detect_list_item];

/// `Python est un langage ...`: short term, substantial definition.
pub fn detect_definition(line: &SourceLine<'_>) -> Option<ConceptIndicator> {
    let def = split_definition(line.text)?;
    if def.term.chars().count() >= 50 || def.rest.chars().count() <= 5 {
        return None;
    }
    Some(ConceptIndicator::new(
        ConceptKind::Definition,
        line.text,
        line.text,
        line.page_number,
    ))
}

/// Lines carrying a year, a percentage or a measured quantity.
pub fn detect_fact(line: &SourceLine<'_>) -> Option<ConceptIndicator> {
    FACT_RE.is_match(line.text).then(|| {
        ConceptIndicator::new(ConceptKind::Fact, line.text, line.text, line.page_number)
    })
}

/// Bulleted or numbered items with enough content after the marker.
pub fn detect_list_item(line: &SourceLine<'_>) -> Option<ConceptIndicator> {
    let marker = LIST_MARKER_RE.find(line.text)?;
    let content = line.text[marker.end()..].trim();
    if content.chars().count() <= 10 {
        return None;
    }
    Some(ConceptIndicator::new(
        ConceptKind::ListItem,
        content,
        line.text,
        line.page_number,
    ))
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract concept candidates, highest priority first, at most `max_concepts`.
///
/// Equal priorities keep detection order.
#[instrument(skip(text), fields(len = text.len()))]
pub fn extract_concepts(text: &str, max_concepts: usize) -> Vec<ConceptIndicator> {
    let mut concepts: Vec<ConceptIndicator> = source_lines(text)
        .filter(|line| (MIN_LINE_CHARS..=MAX_LINE_CHARS).contains(&line.text.chars().count()))
        .flat_map(|line| DETECTORS.iter().filter_map(move |detect| detect(&line)))
        .collect();

    let detected = concepts.len();
    concepts.sort_by(|a, b| b.priority().cmp(&a.priority()));
    concepts.truncate(max_concepts);

    debug!(detected, kept = concepts.len(), "concept extraction complete");
    concepts
}
