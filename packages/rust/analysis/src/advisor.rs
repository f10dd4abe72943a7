//! Card count recommendation.

use deckwright_shared::{CardCountSuggestion, DocumentAnalysis};

/// Never recommend fewer cards than this.
pub const MIN_CARDS: usize = 5;
/// Never recommend more cards than this.
pub const MAX_CARDS: usize = 50;

/// Three-tier density label shared by the factor and the reasoning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityTier {
    Dense,
    Medium,
    Light,
}

impl DensityTier {
    pub fn from_score(density_score: f64) -> Self {
        if density_score > 70.0 {
            Self::Dense
        } else if density_score > 50.0 {
            Self::Medium
        } else {
            Self::Light
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Medium => "medium",
            Self::Light => "light",
        }
    }
}

/// Card multiplier from the density score; sparse documents (< 30) shrink.
fn density_factor(density_score: f64) -> f64 {
    match DensityTier::from_score(density_score) {
        DensityTier::Dense => 1.5,
        DensityTier::Medium => 1.2,
        DensityTier::Light if density_score < 30.0 => 0.7,
        DensityTier::Light => 1.0,
    }
}

fn importance_factor(high_priority_terms: usize) -> f64 {
    if high_priority_terms > 20 {
        1.2
    } else if high_priority_terms > 10 {
        1.1
    } else {
        1.0
    }
}

/// Recommend a card count range for an analyzed document.
///
/// The range always satisfies `5 <= min <= suggested <= max <= 50`.
pub fn suggest_card_count(analysis: &DocumentAnalysis) -> CardCountSuggestion {
    let concepts = analysis.key_concepts.len();
    let base_count = concepts as f64
        * density_factor(analysis.density_score)
        * importance_factor(analysis.importance_factors.high_priority_terms);

    let min_recommended = ((base_count * 0.7).floor() as usize).clamp(MIN_CARDS, MAX_CARDS);
    let max_recommended =
        ((base_count * 1.3).floor() as usize).clamp(min_recommended, MAX_CARDS);
    let suggested = (base_count.round() as usize).clamp(min_recommended, max_recommended);

    let reasoning = format!(
        "Found {concepts} concepts with {:.0}% density. Content is {}.",
        analysis.density_score,
        DensityTier::from_score(analysis.density_score).label()
    );

    tracing::debug!(
        concepts,
        base_count,
        suggested,
        min_recommended,
        max_recommended,
        "card count suggestion"
    );

    CardCountSuggestion {
        suggested,
        min_recommended,
        max_recommended,
        reasoning,
    }
}
