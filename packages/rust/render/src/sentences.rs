//! Card suggestions from free prose, one sentence at a time.
//!
//! Paragraphs are separated by blank lines and sentences by runs of `.`, `!`
//! or `?`. A sentence shaped like `X is|are|was|were Y` becomes a
//! "What is X?" card; failing that, its first number is blanked out.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use deckwright_shared::{CardKind, CardPayload};

use crate::basic::capitalize;
use crate::cloze::wrap_range;

/// Subjects must be shorter than this.
const MAX_SUBJECT_CHARS: usize = 100;
/// Statements must be longer than this.
const MIN_STATEMENT_CHARS: usize = 10;

const BLANK: &str = "___";

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence end regex"));

static STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:is|are|was|were)\s+(.+)$").expect("statement regex")
});

/// A year, or any number with an optional decimal part and percent sign.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b|\b\d+(?:\.\d+)?%?\b").expect("number regex"));

/// A card together with the sentence it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedCard {
    pub card: CardPayload,
    pub source: String,
}

/// Trimmed, non-empty sentences in document order.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .flat_map(|paragraph| {
            SENTENCE_END_RE
                .split(paragraph)
                .map(str::trim)
                .filter(|sentence| !sentence.is_empty())
        })
        .collect()
}

/// Suggest up to `max_cards` cards of `kind` from `text`.
///
/// Only the first `2 * max_cards` sentences are inspected.
pub fn suggest_text_cards(text: &str, kind: CardKind, max_cards: usize) -> Vec<SuggestedCard> {
    let mut cards = Vec::new();
    for sentence in split_sentences(text)
        .into_iter()
        .take(max_cards.saturating_mul(2))
    {
        if cards.len() >= max_cards {
            break;
        }
        let card = statement_card(sentence, kind).or_else(|| number_card(sentence, kind));
        if let Some(card) = card {
            cards.push(SuggestedCard {
                card,
                source: sentence.to_string(),
            });
        }
    }
    cards
}

fn statement_card(sentence: &str, kind: CardKind) -> Option<CardPayload> {
    let caps = STATEMENT_RE.captures(sentence)?;
    let subject = caps.get(1)?.as_str().trim();
    let statement = caps.get(2)?.as_str().trim();
    if subject.chars().count() >= MAX_SUBJECT_CHARS
        || statement.chars().count() <= MIN_STATEMENT_CHARS
    {
        return None;
    }

    Some(match kind {
        CardKind::Basic => {
            CardPayload::basic(format!("What is {subject}?"), capitalize(statement))
        }
        CardKind::Cloze => CardPayload::cloze(format!("{{{{c1::{subject}}}}} is {statement}")),
    })
}

fn number_card(sentence: &str, kind: CardKind) -> Option<CardPayload> {
    let m = NUMBER_RE.find(sentence)?;
    Some(match kind {
        CardKind::Basic => CardPayload::basic(
            format!("{}{BLANK}{}", &sentence[..m.start()], &sentence[m.end()..]),
            sentence,
        ),
        CardKind::Cloze => CardPayload::cloze(wrap_range(sentence, m.start(), m.end(), 1)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckwright_shared::CardContent;

    const TEXT: &str = "\
Photosynthesis is the process by which plants turn light into energy. \
The Eiffel Tower was completed in 1889!

Water boils at 100 degrees at sea level.";

    fn contents(cards: &[SuggestedCard]) -> Vec<&CardContent> {
        cards.iter().map(|c| &c.card.content).collect()
    }

    #[test]
    fn sentences_split_on_paragraphs_and_punctuation() {
        assert_eq!(
            split_sentences(TEXT),
            vec![
                "Photosynthesis is the process by which plants turn light into energy",
                "The Eiffel Tower was completed in 1889",
                "Water boils at 100 degrees at sea level",
            ]
        );
        assert_eq!(split_sentences("Pi is 3.14?!"), vec!["Pi is 3", "14"]);
    }

    #[test]
    fn basic_suggestions() {
        let cards = suggest_text_cards(TEXT, CardKind::Basic, 10);
        assert_eq!(
            contents(&cards),
            vec![
                &CardContent::Basic {
                    front: "What is Photosynthesis?".into(),
                    back: "The process by which plants turn light into energy".into(),
                },
                &CardContent::Basic {
                    front: "What is The Eiffel Tower?".into(),
                    back: "Completed in 1889".into(),
                },
                &CardContent::Basic {
                    front: "Water boils at ___ degrees at sea level".into(),
                    back: "Water boils at 100 degrees at sea level".into(),
                },
            ]
        );
        assert_eq!(cards[1].source, "The Eiffel Tower was completed in 1889");
    }

    #[test]
    fn cloze_suggestions() {
        let cards = suggest_text_cards(TEXT, CardKind::Cloze, 10);
        assert_eq!(
            contents(&cards),
            vec![
                &CardContent::Cloze {
                    text: "{{c1::Photosynthesis}} is the process by which plants turn light \
                           into energy"
                        .into()
                },
                &CardContent::Cloze {
                    text: "{{c1::The Eiffel Tower}} is completed in 1889".into()
                },
                &CardContent::Cloze {
                    text: "Water boils at {{c1::100}} degrees at sea level".into()
                },
            ]
        );
    }

    #[test]
    fn short_statement_falls_back_to_number() {
        let cards = suggest_text_cards("The answer is 42", CardKind::Basic, 10);
        assert_eq!(
            cards[0].card.content,
            CardContent::Basic {
                front: "The answer is ___".into(),
                back: "The answer is 42".into(),
            }
        );
        assert!(suggest_text_cards("Nothing to see here", CardKind::Basic, 10).is_empty());
    }

    #[test]
    fn card_cap_and_sentence_window() {
        assert_eq!(suggest_text_cards(TEXT, CardKind::Basic, 1).len(), 1);

        // Only the first two sentences are read for a single card.
        let text = "Hello there. Nothing here. The answer is 42.";
        assert!(suggest_text_cards(text, CardKind::Basic, 1).is_empty());
        assert!(suggest_text_cards(TEXT, CardKind::Basic, 0).is_empty());
    }
}
