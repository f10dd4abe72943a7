//! Document-wide counters feeding the density scorer.

use std::sync::LazyLock;

use regex::Regex;

use deckwright_extract::WORDS_PER_PAGE;

/// Cap on collected technical terms.
pub const MAX_TECHNICAL_TERMS: usize = 50;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Heading shapes: all-caps lines, `1. Title`, `IV. Title`.
static SECTION_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^[A-Z\s]{10,}$").expect("caps heading regex"),
        Regex::new(r"^\d+\.\s+[A-Z]").expect("numbered heading regex"),
        Regex::new(r"^[IVX]+\.\s+[A-Z]").expect("roman heading regex"),
    ]
});

/// Capitalized word or short acronym.
static TECHNICAL_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Z][a-z]+|[A-Z]{2,6})$").expect("technical term regex")
});

/// Definition phrasing anywhere in running text, French and English.
static DEFINITION_PHRASE_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\w+\s+(?:est|est un|est une|signifie|désigne|se réfère à)\s+")
            .expect("french definition phrase regex"),
        Regex::new(r"(?i)\w+\s+(?:is|is a|is an|means|refers to|denotes)\s+")
            .expect("english definition phrase regex"),
    ]
});

/// Bulleted or numbered list line.
static LIST_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-•*]|\d+[.)])\s+").expect("list line regex")
});

const FORMULA_SYMBOLS: &[char] = &['=', '∑', '∫', '∂', 'π', '√', '±', '×', '÷'];

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Raw counts gathered in one pass over the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentCounters {
    pub word_count: usize,
    pub page_count: usize,
    pub section_count: usize,
    pub technical_terms: Vec<String>,
    pub definitions_found: usize,
    pub formulas_found: usize,
    pub lists_found: usize,
}

impl DocumentCounters {
    /// Gather counters; `estimated_page_count` wins over the word-based estimate
    /// when it is present and non-zero.
    pub fn collect(text: &str, estimated_page_count: Option<usize>) -> Self {
        let word_count = text.split_whitespace().count();
        let page_count = estimated_page_count
            .filter(|&pages| pages > 0)
            .unwrap_or_else(|| estimate_page_count(word_count));

        Self {
            word_count,
            page_count,
            section_count: count_sections(text),
            technical_terms: technical_terms(text),
            definitions_found: count_definitions(text),
            formulas_found: count_formula_symbols(text),
            lists_found: count_list_lines(text),
        }
    }
}

/// `max(1, word_count / 300)`.
pub fn estimate_page_count(word_count: usize) -> usize {
    (word_count / WORDS_PER_PAGE).max(1)
}

fn count_sections(text: &str) -> usize {
    text.lines()
        .map(str::trim)
        .filter(|line| SECTION_RES.iter().any(|re| re.is_match(line)))
        .count()
}

/// Capitalized words and acronyms longer than two characters, first-seen
/// order, deduplicated, capped at [`MAX_TECHNICAL_TERMS`].
fn technical_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        let word = word.trim_matches(|c: char| c.is_ascii_punctuation());
        if word.len() > 2
            && TECHNICAL_TERM_RE.is_match(word)
            && !terms.iter().any(|t| t == word)
        {
            terms.push(word.to_string());
            if terms.len() == MAX_TECHNICAL_TERMS {
                break;
            }
        }
    }
    terms
}

fn count_definitions(text: &str) -> usize {
    DEFINITION_PHRASE_RES
        .iter()
        .map(|re| re.find_iter(text).count())
        .sum()
}

fn count_formula_symbols(text: &str) -> usize {
    text.chars().filter(|c| FORMULA_SYMBOLS.contains(c)).count()
}

fn count_list_lines(text: &str) -> usize {
    text.lines().filter(|line| LIST_LINE_RE.is_match(line)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_estimate_and_override() {
        assert_eq!(estimate_page_count(0), 1);
        assert_eq!(estimate_page_count(299), 1);
        assert_eq!(estimate_page_count(900), 3);

        let counters = DocumentCounters::collect("a few words", Some(12));
        assert_eq!(counters.page_count, 12);
        let counters = DocumentCounters::collect("a few words", Some(0));
        assert_eq!(counters.page_count, 1);
        assert_eq!(counters.word_count, 3);
    }

    #[test]
    fn sections_cover_three_heading_styles() {
        let text = "INTRODUCTION GENERALE\n1. Overview of cells\nII. Methods\nplain line\n2. lowercase start";
        assert_eq!(count_sections(text), 3);
    }

    #[test]
    fn technical_terms_are_deduplicated_in_order() {
        let text = "The DNA of Python, and Python again. NASA uses DNA. Ok XY";
        let terms = technical_terms(text);
        assert_eq!(terms, vec!["The", "DNA", "Python", "NASA"]);
    }

    #[test]
    fn technical_terms_are_capped() {
        let text: String = ('a'..='c')
            .flat_map(|a| ('a'..='z').map(move |b| format!("Term{a}{b} ")))
            .collect();
        let terms = technical_terms(&text);
        assert_eq!(terms.len(), MAX_TECHNICAL_TERMS);
        assert_eq!(terms[0], "Termaa");
        assert_eq!(terms[49], "Termbx");
    }

    #[test]
    fn counts_definitions_formulas_and_lists() {
        let text = "\
Une cellule est une unité du vivant.
Energy is the capacity to do work.
E = mc² and a ± b
- bullet one
* bullet two
3) numbered";
        let counters = DocumentCounters::collect(text, None);
        assert_eq!(counters.definitions_found, 2);
        assert_eq!(counters.formulas_found, 2);
        assert_eq!(counters.lists_found, 3);
    }
}
