//! Document analysis: counters, density scoring and card count advice.
//!
//! [`analyze_document`] is the entry point; [`suggest_card_count`] turns its
//! result into a recommended range.

pub mod advisor;
pub mod density;
pub mod metrics;

use tracing::{debug, instrument};

use deckwright_extract::{DEFAULT_MAX_CONCEPTS, extract_concepts};
use deckwright_shared::DocumentAnalysis;

pub use advisor::{DensityTier, MAX_CARDS, MIN_CARDS, suggest_card_count};
pub use density::{density_score, importance_factors};
pub use metrics::{DocumentCounters, MAX_TECHNICAL_TERMS, estimate_page_count};

/// Knobs for [`analyze_document_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Authoritative page count, e.g. from the PDF reader. Zero means unknown.
    pub estimated_page_count: Option<usize>,
    /// Cap on `key_concepts`.
    pub max_concepts: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            estimated_page_count: None,
            max_concepts: DEFAULT_MAX_CONCEPTS,
        }
    }
}

/// Analyze `text` with the default concept cap.
pub fn analyze_document(text: &str, estimated_page_count: Option<usize>) -> DocumentAnalysis {
    analyze_document_with(
        text,
        AnalyzeOptions {
            estimated_page_count,
            ..AnalyzeOptions::default()
        },
    )
}

/// Analyze `text`: counters, ranked concepts, density and importance factors.
#[instrument(skip(text), fields(len = text.len()))]
pub fn analyze_document_with(text: &str, options: AnalyzeOptions) -> DocumentAnalysis {
    let counters = DocumentCounters::collect(text, options.estimated_page_count);
    let key_concepts = extract_concepts(text, options.max_concepts);
    let density_score = density_score(&counters);
    let importance_factors = importance_factors(&counters);

    debug!(
        words = counters.word_count,
        pages = counters.page_count,
        concepts = key_concepts.len(),
        density_score,
        "document analyzed"
    );

    DocumentAnalysis {
        page_count: counters.page_count,
        word_count: counters.word_count,
        section_count: counters.section_count,
        technical_terms: counters.technical_terms,
        definitions_found: counters.definitions_found,
        formulas_found: counters.formulas_found,
        lists_found: counters.lists_found,
        key_concepts,
        density_score,
        importance_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckwright_shared::ConceptKind;

    const COURSE: &str = "\
1. INTRODUCTION
La photosynthèse est un processus biologique essentiel aux plantes.
Elle a été décrite en 1779 par Jan Ingenhousz.
- Les chloroplastes captent la lumière du soleil
- La chlorophylle absorbe surtout le rouge et le bleu
Environ 70% de l'oxygène provient des océans.";

    #[test]
    fn analysis_combines_counters_and_concepts() {
        let analysis = analyze_document(COURSE, None);
        assert_eq!(analysis.page_count, 1);
        assert_eq!(analysis.section_count, 1);
        assert!(analysis.definitions_found >= 1);
        // The numbered heading also reads as a list line.
        assert_eq!(analysis.lists_found, 3);
        assert!((0.0..=100.0).contains(&analysis.density_score));

        assert_eq!(analysis.key_concepts[0].kind(), ConceptKind::Definition);
        let facts = analysis
            .key_concepts
            .iter()
            .filter(|c| c.kind() == ConceptKind::Fact)
            .count();
        assert_eq!(facts, 2);
        assert!(analysis.technical_terms.iter().any(|t| t == "Ingenhousz"));
    }

    #[test]
    fn explicit_page_count_is_used() {
        let analysis = analyze_document(COURSE, Some(8));
        assert_eq!(analysis.page_count, 8);
    }

    #[test]
    fn concept_cap_is_honored() {
        let analysis = analyze_document_with(
            COURSE,
            AnalyzeOptions {
                max_concepts: 1,
                ..AnalyzeOptions::default()
            },
        );
        assert_eq!(analysis.key_concepts.len(), 1);
    }

    #[test]
    fn density_stays_in_range_for_dense_input() {
        let dense = "Energy is the capacity to do work here.\n".repeat(200);
        let analysis = analyze_document(&dense, None);
        assert_eq!(analysis.density_score, 100.0);

        let suggestion = suggest_card_count(&analysis);
        assert!(suggestion.max_recommended <= MAX_CARDS);
    }
}
