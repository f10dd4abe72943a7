//! Multiple-choice question rendering.

use serde::Serialize;

use deckwright_shared::{CardPayload, QcmQuestion};

/// Front and back text of a rendered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QcmCard {
    pub front: String,
    pub back: String,
}

impl QcmCard {
    /// Basic payload; questions carry no page or priority.
    pub fn into_payload(self) -> CardPayload {
        CardPayload::basic(self.front, self.back)
    }
}

/// Render a question as a basic card.
///
/// The front lists every option, the back only the correct ones; both are in
/// letter order regardless of the order answers were given in.
pub fn render_qcm(question: &QcmQuestion) -> QcmCard {
    let options: Vec<String> = question
        .options()
        .iter()
        .map(|(letter, text)| format!("{letter}) {text}"))
        .collect();

    let mut correct = question.correct_answers().to_vec();
    correct.sort_unstable();
    let answers: Vec<String> = correct
        .iter()
        .filter_map(|letter| {
            let text = question.options().get(letter)?;
            Some(format!("{letter}) {text}"))
        })
        .collect();

    QcmCard {
        front: format!("{}\n\n{}", question.question_text(), options.join("\n")),
        back: answers.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckwright_extract::extract_questions;
    use deckwright_shared::Language;

    const CAPITAL: &str =
        "1. What is the capital of France?\na) London\nb) Paris\nc) Berlin\nd) Madrid\nAnswer: b";

    #[test]
    fn renders_capital_question() {
        let q = &extract_questions(CAPITAL, Language::En)[0];
        let card = render_qcm(q);
        assert_eq!(
            card.front,
            "What is the capital of France?\n\na) London\nb) Paris\nc) Berlin\nd) Madrid"
        );
        assert_eq!(card.back, "b) Paris");
    }

    #[test]
    fn back_is_sorted_by_letter() {
        let text = "5. Which are prime?\nc) 5\na) 2\nb) 4\nAnswers: c, a";
        let q = &extract_questions(text, Language::En)[0];
        let card = render_qcm(q);
        assert!(card.front.ends_with("a) 2\nb) 4\nc) 5"));
        assert_eq!(card.back, "a) 2\nc) 5");
    }

    #[test]
    fn rendered_text_does_not_reparse() {
        let q = &extract_questions(CAPITAL, Language::En)[0];
        let card = render_qcm(q);
        let rendered = format!("{}\n{}", card.front, card.back);
        assert!(extract_questions(&rendered, Language::En).is_empty());
    }

    #[test]
    fn payload_has_no_source_metadata() {
        let q = &extract_questions(CAPITAL, Language::En)[0];
        let payload = render_qcm(q).into_payload();
        assert_eq!(payload.source_page, 0);
        assert_eq!(payload.priority, 0);
    }
}
