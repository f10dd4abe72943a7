//! End-to-end pipelines: source text → parsed items → rendered cards.
//!
//! Both pipelines are synchronous and side-effect free apart from logging and
//! progress callbacks; persisting cards is left to a [`CardSink`].
//!
//! [`CardSink`]: crate::sink::CardSink

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use deckwright_analysis::{AnalyzeOptions, analyze_document_with, suggest_card_count};
use deckwright_extract::{DEFAULT_MAX_CONCEPTS, extract_questions};
use deckwright_render::{
    HiddenTermCard, SuggestedCard, cloze_from_detected_terms, cloze_from_hints, render_concept,
    render_qcm, suggest_text_cards,
};
use deckwright_shared::{
    CardCountSuggestion, CardKind, CardPayload, DeckwrightError, DocumentAnalysis, Language,
    Result, text_sample,
};

/// Sample length attached to a `NoQuestions` error.
const QCM_SAMPLE_CHARS: usize = 500;
/// Sample length attached to `NoConcepts` and `NoCandidates` errors.
const COURSE_SAMPLE_CHARS: usize = 300;
/// Card count used when a zero count is requested.
pub const DEFAULT_MAX_CARDS: usize = 10;
/// Technical terms echoed in the analysis summary.
const SUMMARY_TERMS: usize = 10;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each card is rendered.
    fn card_rendered(&self, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, cards: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn card_rendered(&self, _current: usize, _total: usize) {}
    fn done(&self, _cards: usize) {}
}

// ---------------------------------------------------------------------------
// QCM pipeline
// ---------------------------------------------------------------------------

/// Options for [`generate_qcm_cards`].
#[derive(Debug, Clone, Default)]
pub struct QcmOptions {
    /// Selects the answer-keyword vocabulary.
    pub language: Language,
    /// Keep only the first N questions.
    pub max_questions: Option<usize>,
}

/// One rendered question.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedQuestion {
    pub number: u32,
    pub correct_answers: Vec<char>,
    pub card: CardPayload,
}

/// Result of the QCM pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct QcmRun {
    /// Questions parsed before the cap was applied.
    pub questions_found: usize,
    pub cards: Vec<RenderedQuestion>,
}

/// Parse multiple-choice questions from `text` and render each as a basic card.
#[instrument(skip_all, fields(language = %options.language, len = text.len()))]
pub fn generate_qcm_cards(
    text: &str,
    options: &QcmOptions,
    progress: &dyn ProgressReporter,
) -> Result<QcmRun> {
    let start = Instant::now();
    ensure_text(text)?;

    progress.phase("Parsing questions");
    let mut questions = extract_questions(text, options.language);
    let questions_found = questions.len();
    if questions.is_empty() {
        return Err(DeckwrightError::NoQuestions {
            language: options.language.to_string(),
            sample: text_sample(text, QCM_SAMPLE_CHARS),
        });
    }
    if let Some(max) = options.max_questions {
        questions.truncate(max);
    }

    progress.phase("Rendering cards");
    let total = questions.len();
    let cards: Vec<RenderedQuestion> = questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let card = render_qcm(question).into_payload();
            progress.card_rendered(i + 1, total);
            RenderedQuestion {
                number: question.number(),
                correct_answers: question.correct_answers().to_vec(),
                card,
            }
        })
        .collect();

    progress.done(cards.len());
    info!(
        found = questions_found,
        rendered = cards.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "QCM pipeline complete"
    );

    Ok(QcmRun {
        questions_found,
        cards,
    })
}

// ---------------------------------------------------------------------------
// Course pipeline
// ---------------------------------------------------------------------------

/// Options for [`generate_course_cards`].
#[derive(Debug, Clone)]
pub struct CourseOptions {
    /// Let the advisor pick the number of cards.
    pub auto_count: bool,
    /// Card count when not auto-counting; `Some(0)` means [`DEFAULT_MAX_CARDS`].
    pub max_cards: Option<usize>,
    /// Mix basic and cloze cards by concept kind.
    pub mix_types: bool,
    pub preferred_kind: CardKind,
    /// Cap on concepts kept by the analysis.
    pub max_concepts: usize,
    /// Authoritative page count from the text extractor, if any.
    pub estimated_page_count: Option<usize>,
}

impl Default for CourseOptions {
    fn default() -> Self {
        Self {
            auto_count: false,
            max_cards: Some(DEFAULT_MAX_CARDS),
            mix_types: true,
            preferred_kind: CardKind::Basic,
            max_concepts: DEFAULT_MAX_CONCEPTS,
            estimated_page_count: None,
        }
    }
}

/// Headline numbers from the document analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub page_count: usize,
    pub word_count: usize,
    pub density_score: f64,
    pub concepts_found: usize,
    /// First few technical terms, in document order.
    pub technical_terms: Vec<String>,
}

impl From<&DocumentAnalysis> for AnalysisSummary {
    fn from(analysis: &DocumentAnalysis) -> Self {
        Self {
            page_count: analysis.page_count,
            word_count: analysis.word_count,
            density_score: analysis.density_score,
            concepts_found: analysis.key_concepts.len(),
            technical_terms: analysis
                .technical_terms
                .iter()
                .take(SUMMARY_TERMS)
                .cloned()
                .collect(),
        }
    }
}

/// Result of the course pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct CourseRun {
    pub analysis: AnalysisSummary,
    /// Present when the card count came from the advisor.
    pub suggestion: Option<CardCountSuggestion>,
    pub cards: Vec<CardPayload>,
}

/// Analyze course material and render its highest-priority concepts.
#[instrument(skip_all, fields(auto_count = options.auto_count, len = text.len()))]
pub fn generate_course_cards(
    text: &str,
    options: &CourseOptions,
    progress: &dyn ProgressReporter,
) -> Result<CourseRun> {
    let start = Instant::now();
    if !options.auto_count && options.max_cards.is_none() {
        return Err(DeckwrightError::invalid_argument(
            "either auto_count must be enabled or max_cards must be provided",
        ));
    }
    ensure_text(text)?;

    progress.phase("Analyzing document");
    let analysis = analyze_document_with(
        text,
        AnalyzeOptions {
            estimated_page_count: options.estimated_page_count,
            max_concepts: options.max_concepts,
        },
    );
    if analysis.key_concepts.is_empty() {
        return Err(DeckwrightError::NoConcepts {
            word_count: analysis.word_count,
            page_count: analysis.page_count,
            density_score: analysis.density_score,
            sample: text_sample(text, COURSE_SAMPLE_CHARS),
        });
    }

    let (card_count, suggestion) = if options.auto_count {
        let suggestion = suggest_card_count(&analysis);
        debug!(suggested = suggestion.suggested, "using advisor card count");
        (suggestion.suggested, Some(suggestion))
    } else {
        let count = options
            .max_cards
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CARDS);
        (count, None)
    };

    progress.phase("Rendering cards");
    let selected = &analysis.key_concepts[..card_count.min(analysis.key_concepts.len())];
    let total = selected.len();
    let cards: Vec<CardPayload> = selected
        .iter()
        .enumerate()
        .map(|(i, concept)| {
            let card = render_concept(concept, options.mix_types, options.preferred_kind);
            progress.card_rendered(i + 1, total);
            card
        })
        .collect();

    progress.done(cards.len());
    info!(
        concepts = analysis.key_concepts.len(),
        requested = card_count,
        rendered = cards.len(),
        density = analysis.density_score,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "course pipeline complete"
    );

    Ok(CourseRun {
        analysis: AnalysisSummary::from(&analysis),
        suggestion,
        cards,
    })
}

// ---------------------------------------------------------------------------
// Free-text pipelines
// ---------------------------------------------------------------------------

/// Options for [`generate_text_cards`].
#[derive(Debug, Clone)]
pub struct TextOptions {
    pub kind: CardKind,
    pub max_cards: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            kind: CardKind::Basic,
            max_cards: DEFAULT_MAX_CARDS,
        }
    }
}

/// Suggest cards sentence by sentence from free prose.
#[instrument(skip_all, fields(kind = %options.kind, max_cards = options.max_cards))]
pub fn generate_text_cards(
    text: &str,
    options: &TextOptions,
    progress: &dyn ProgressReporter,
) -> Result<Vec<SuggestedCard>> {
    let start = Instant::now();
    if options.max_cards == 0 {
        return Err(DeckwrightError::invalid_argument(
            "max_cards must be at least 1",
        ));
    }
    ensure_text(text)?;

    progress.phase("Scanning sentences");
    let cards = suggest_text_cards(text, options.kind, options.max_cards);
    if cards.is_empty() {
        return Err(DeckwrightError::NoCandidates {
            guidance: "could not extract suitable flashcard content from the text. Try more \
                       structured content with definitions or key facts"
                .into(),
            sample: text_sample(text, COURSE_SAMPLE_CHARS),
        });
    }

    progress.done(cards.len());
    info!(
        cards = cards.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "text pipeline complete"
    );
    Ok(cards)
}

/// Build cloze cards hiding `hints`, or detected terms when `hints` is empty.
#[instrument(skip_all, fields(hints = hints.len(), len = text.len()))]
pub fn generate_cloze_cards(
    text: &str,
    hints: &[String],
    progress: &dyn ProgressReporter,
) -> Result<Vec<HiddenTermCard>> {
    ensure_text(text)?;

    let cards = if hints.is_empty() {
        progress.phase("Detecting terms");
        cloze_from_detected_terms(text)
    } else {
        progress.phase("Hiding terms");
        cloze_from_hints(text, hints)
    };
    if cards.is_empty() {
        return Err(DeckwrightError::NoCandidates {
            guidance: "could not identify terms for cloze deletions. Try passing hints".into(),
            sample: text_sample(text, COURSE_SAMPLE_CHARS),
        });
    }
    debug!(
        terms = ?cards.iter().map(|c| c.hidden_term.as_str()).collect::<Vec<_>>(),
        "hidden terms"
    );

    progress.done(cards.len());
    info!(cards = cards.len(), "cloze pipeline complete");
    Ok(cards)
}

/// Reject empty or whitespace-only input.
fn ensure_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(DeckwrightError::EmptyInput {
            sample: text_sample(text, QCM_SAMPLE_CHARS),
        });
    }
    Ok(())
}
