//! Flashcard rendering.
//!
//! - [`qcm`] turns parsed questions into front/back cards
//! - [`select`] picks basic or cloze for a concept
//! - [`basic`] and [`cloze`] render concepts in each encoding
//! - [`sentences`] suggests cards sentence by sentence from free prose
//! - [`hints`] hides chosen or detected terms as cloze deletions
//! - [`quality`] scores rendered cards

pub mod basic;
pub mod cloze;
pub mod hints;
pub mod qcm;
pub mod quality;
pub mod select;
pub mod sentences;

use tracing::trace;

use deckwright_shared::{CardKind, CardPayload, ConceptIndicator};

pub use basic::render_basic;
pub use cloze::{cloze_text, has_deletion, render_cloze};
pub use hints::{HiddenTermCard, cloze_from_detected_terms, cloze_from_hints, detect_cloze_terms};
pub use qcm::{QcmCard, render_qcm};
pub use quality::{Quality, QualityReport, check_card_quality, check_payload};
pub use select::decide_card_kind;
pub use sentences::{SuggestedCard, split_sentences, suggest_text_cards};

/// Render a concept as a card carrying its page and priority.
///
/// Basic is used when [`decide_card_kind`] says so, or when mixing is off and
/// the caller prefers basic cards. A cloze preference never turns a basic
/// suggestion into a cloze card.
pub fn render_concept(
    concept: &ConceptIndicator,
    mix_types: bool,
    preferred_kind: CardKind,
) -> CardPayload {
    let decided = decide_card_kind(concept, mix_types);
    let as_basic =
        decided == CardKind::Basic || (!mix_types && preferred_kind == CardKind::Basic);

    trace!(
        kind = ?concept.kind(),
        %decided,
        basic = as_basic,
        "rendering concept"
    );

    let card = if as_basic {
        render_basic(concept.text())
    } else {
        render_cloze(concept.kind(), concept.text())
    };
    card.with_source(concept.page_number(), concept.priority())
}
