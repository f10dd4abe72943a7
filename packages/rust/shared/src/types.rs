//! Core domain types for the flashcard synthesis pipeline.
//!
//! Every record here is produced in a single pass over the source text and
//! consumed once by the renderer or the caller. Records whose invariants matter
//! ([`ConceptIndicator`], [`QcmQuestion`]) keep their fields private and can
//! only be built through validating constructors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeckwrightError;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Language of the source document, selecting the answer-keyword vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
    Es,
}

impl Language {
    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DeckwrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(DeckwrightError::invalid_argument(format!(
                "unsupported language '{other}': expected 'fr', 'en' or 'es'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Card and concept kinds
// ---------------------------------------------------------------------------

/// Flashcard encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Front/back question and answer.
    #[default]
    Basic,
    /// Text with `{{cN::...}}` deletions.
    Cloze,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Cloze => f.write_str("cloze"),
        }
    }
}

impl FromStr for CardKind {
    type Err = DeckwrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "cloze" => Ok(Self::Cloze),
            other => Err(DeckwrightError::invalid_argument(format!(
                "unknown card kind '{other}': expected 'basic' or 'cloze'"
            ))),
        }
    }
}

/// What a concept candidate was detected as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    Definition,
    Fact,
    ListItem,
    Formula,
}

impl ConceptKind {
    /// Fixed priority for this kind (5 is highest).
    pub fn priority(self) -> u8 {
        match self {
            Self::Definition => 4,
            Self::Fact | Self::Formula => 3,
            Self::ListItem => 2,
        }
    }

    /// Card encoding suggested at detection time.
    pub fn suggested_card_kind(self) -> CardKind {
        match self {
            Self::Definition => CardKind::Basic,
            Self::Fact | Self::ListItem | Self::Formula => CardKind::Cloze,
        }
    }
}

// ---------------------------------------------------------------------------
// ConceptIndicator
// ---------------------------------------------------------------------------

/// A line-level detection of potential flashcard material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptIndicator {
    text: String,
    kind: ConceptKind,
    priority: u8,
    page_number: usize,
    context: String,
    suggested_card_kind: CardKind,
}

impl ConceptIndicator {
    /// Build a concept; priority and suggested card kind derive from `kind`.
    pub fn new(
        kind: ConceptKind,
        text: impl Into<String>,
        context: impl Into<String>,
        page_number: usize,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            priority: kind.priority(),
            page_number,
            context: context.into(),
            suggested_card_kind: kind.suggested_card_kind(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ConceptKind {
        self.kind
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// The full source line the concept was detected on.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn suggested_card_kind(&self) -> CardKind {
        self.suggested_card_kind
    }
}

// ---------------------------------------------------------------------------
// QcmQuestion
// ---------------------------------------------------------------------------

/// A parsed multiple-choice question.
///
/// Options are keyed by lower-case letter `a`..=`d`; the map keeps them sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QcmQuestion {
    number: u32,
    question_text: String,
    options: BTreeMap<char, String>,
    correct_answers: Vec<char>,
    raw_text: String,
}

impl QcmQuestion {
    /// Validate and build a question.
    ///
    /// Returns `None` unless the question text is non-empty, at least two
    /// options exist and at least one answer letter names an existing option.
    /// Answer letters are lower-cased, deduplicated in first-seen order, and
    /// letters with no matching option are dropped.
    pub fn new(
        number: u32,
        question_text: impl Into<String>,
        options: BTreeMap<char, String>,
        correct_answers: impl IntoIterator<Item = char>,
        raw_text: impl Into<String>,
    ) -> Option<Self> {
        let question_text = question_text.into();
        if question_text.trim().is_empty() || options.len() < 2 {
            return None;
        }

        let mut answers: Vec<char> = Vec::new();
        for letter in correct_answers {
            let letter = letter.to_ascii_lowercase();
            if options.contains_key(&letter) && !answers.contains(&letter) {
                answers.push(letter);
            }
        }
        if answers.is_empty() {
            return None;
        }

        Some(Self {
            number,
            question_text,
            options,
            correct_answers: answers,
            raw_text: raw_text.into(),
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &BTreeMap<char, String> {
        &self.options
    }

    /// Correct letters in the order the answer line listed them.
    pub fn correct_answers(&self) -> &[char] {
        &self.correct_answers
    }

    /// The untouched source block.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

// ---------------------------------------------------------------------------
// DocumentAnalysis
// ---------------------------------------------------------------------------

/// Named weighting factors derived from document-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportanceFactors {
    /// Technical terms longer than four characters.
    pub high_priority_terms: usize,
    /// Definitions per page.
    pub definition_ratio: f64,
    /// Technical terms per 1000 words.
    pub technical_density: f64,
}

/// Content metrics and detected concepts for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentAnalysis {
    pub page_count: usize,
    pub word_count: usize,
    pub section_count: usize,
    /// Deduplicated, first-seen order, at most 50 entries.
    pub technical_terms: Vec<String>,
    pub definitions_found: usize,
    pub formulas_found: usize,
    pub lists_found: usize,
    /// Priority descending, ties in detection order.
    pub key_concepts: Vec<ConceptIndicator>,
    /// Always within `0.0..=100.0`.
    pub density_score: f64,
    pub importance_factors: ImportanceFactors,
}

// ---------------------------------------------------------------------------
// CardCountSuggestion
// ---------------------------------------------------------------------------

/// Recommended number of cards for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCountSuggestion {
    pub suggested: usize,
    pub min_recommended: usize,
    pub max_recommended: usize,
    pub reasoning: String,
}

// ---------------------------------------------------------------------------
// CardPayload
// ---------------------------------------------------------------------------

/// Rendered card content; exactly one shape per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardContent {
    Basic { front: String, back: String },
    Cloze { text: String },
}

/// A rendered card plus its source metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPayload {
    #[serde(flatten)]
    pub content: CardContent,
    pub source_page: usize,
    pub priority: u8,
}

impl CardPayload {
    pub fn basic(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            content: CardContent::Basic {
                front: front.into(),
                back: back.into(),
            },
            source_page: 0,
            priority: 0,
        }
    }

    pub fn cloze(text: impl Into<String>) -> Self {
        Self {
            content: CardContent::Cloze { text: text.into() },
            source_page: 0,
            priority: 0,
        }
    }

    /// Attach source page and priority metadata.
    pub fn with_source(mut self, source_page: usize, priority: u8) -> Self {
        self.source_page = source_page;
        self.priority = priority;
        self
    }

    pub fn kind(&self) -> CardKind {
        match self.content {
            CardContent::Basic { .. } => CardKind::Basic,
            CardContent::Cloze { .. } => CardKind::Cloze,
        }
    }
}
