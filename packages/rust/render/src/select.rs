//! Card kind selection for a concept.

use deckwright_shared::{CardKind, ConceptIndicator, ConceptKind};

/// Definitions at least this long read better as cloze text when mixing.
const SHORT_DEFINITION_CHARS: usize = 100;

/// Choose the encoding for `concept`.
///
/// Without mixing the concept's own suggestion stands. With mixing, short
/// definitions stay basic and everything else becomes cloze.
pub fn decide_card_kind(concept: &ConceptIndicator, mix_types: bool) -> CardKind {
    if !mix_types {
        return concept.suggested_card_kind();
    }

    match concept.kind() {
        ConceptKind::Definition if concept.text().chars().count() < SHORT_DEFINITION_CHARS => {
            CardKind::Basic
        }
        ConceptKind::Definition
        | ConceptKind::Fact
        | ConceptKind::ListItem
        | ConceptKind::Formula => CardKind::Cloze,
    }
}
