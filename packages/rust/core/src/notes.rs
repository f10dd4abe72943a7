//! Mapping rendered cards onto flashcard-store notes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use deckwright_shared::{CardContent, CardPayload, ModelsConfig};

/// A note as the flashcard store expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub deck_name: String,
    pub model_name: String,
    /// Field name → content.
    pub fields: BTreeMap<String, String>,
    pub tags: Vec<String>,
}

/// Build one note per card: basic cards use the basic model's front/back
/// fields, cloze cards the cloze model's text field.
pub fn build_notes(
    cards: &[CardPayload],
    deck: &str,
    tags: &[String],
    models: &ModelsConfig,
) -> Vec<NoteInput> {
    cards
        .iter()
        .map(|card| {
            let (model_name, fields) = match &card.content {
                CardContent::Basic { front, back } => (
                    &models.basic,
                    BTreeMap::from([
                        (models.basic_front.clone(), front.clone()),
                        (models.basic_back.clone(), back.clone()),
                    ]),
                ),
                CardContent::Cloze { text } => (
                    &models.cloze,
                    BTreeMap::from([(models.cloze_text.clone(), text.clone())]),
                ),
            };
            NoteInput {
                deck_name: deck.to_string(),
                model_name: model_name.clone(),
                fields,
                tags: tags.to_vec(),
            }
        })
        .collect()
}
