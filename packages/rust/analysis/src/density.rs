//! Density and importance scoring.
//!
//! Pure functions of [`DocumentCounters`]; individual concepts play no part.

use deckwright_shared::ImportanceFactors;

use crate::metrics::DocumentCounters;

/// Terms longer than this count as high priority.
const HIGH_PRIORITY_TERM_CHARS: usize = 4;

/// Content density in `0.0..=100.0`.
///
/// `concepts_per_page * 20 + technical_ratio * 30 + definitions * 5 + structure`,
/// where the structural part is `min(20, sections * 2)`.
pub fn density_score(counters: &DocumentCounters) -> f64 {
    let pages = counters.page_count.max(1) as f64;
    let words = counters.word_count.max(1) as f64;

    let concepts_per_page = (counters.definitions_found + counters.formulas_found) as f64 / pages;
    let technical_ratio = counters.technical_terms.len() as f64 / words * 1000.0;
    let structural_score = (counters.section_count * 2).min(20) as f64;

    let score = concepts_per_page * 20.0
        + technical_ratio * 30.0
        + counters.definitions_found as f64 * 5.0
        + structural_score;

    score.clamp(0.0, 100.0)
}

/// Named factors used by the card count advisor.
pub fn importance_factors(counters: &DocumentCounters) -> ImportanceFactors {
    let pages = counters.page_count.max(1) as f64;
    let words = counters.word_count.max(1) as f64;

    ImportanceFactors {
        high_priority_terms: counters
            .technical_terms
            .iter()
            .filter(|t| t.chars().count() > HIGH_PRIORITY_TERM_CHARS)
            .count(),
        definition_ratio: counters.definitions_found as f64 / pages,
        technical_density: counters.technical_terms.len() as f64 / words * 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters() -> DocumentCounters {
        DocumentCounters {
            word_count: 10_000,
            page_count: 10,
            section_count: 3,
            technical_terms: vec!["Cell".into(), "Protein".into(), "DNA".into()],
            definitions_found: 2,
            formulas_found: 8,
            lists_found: 0,
        }
    }

    #[test]
    fn weighted_sum_below_cap() {
        // 1 concept/page * 20 + 0.3 * 30 + 2 * 5 + 6
        let score = density_score(&counters());
        assert!((score - 45.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn score_is_clamped() {
        let mut c = counters();
        c.definitions_found = 100;
        assert_eq!(density_score(&c), 100.0);

        assert_eq!(density_score(&DocumentCounters::default()), 0.0);
    }

    #[test]
    fn structural_part_saturates() {
        let mut few = counters();
        few.section_count = 10;
        let mut many = counters();
        many.section_count = 50;
        assert_eq!(density_score(&few), density_score(&many));
    }

    #[test]
    fn factors_from_counters() {
        let f = importance_factors(&counters());
        assert_eq!(f.high_priority_terms, 1);
        assert!((f.definition_ratio - 0.2).abs() < 1e-9);
        assert!((f.technical_density - 0.3).abs() < 1e-9);
    }
}
