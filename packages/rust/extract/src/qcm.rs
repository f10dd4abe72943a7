//! Multiple-choice question (QCM) parser.
//!
//! Expected layout, one block per question:
//!
//! ```text
//! 1. Question text here?
//! a) Option A
//! b) Option B
//! c) Option C
//! Réponse: a, c
//! ```
//!
//! Blocks that do not yield a question text, two options and one valid answer
//! are dropped without error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};

use deckwright_shared::{Language, QcmQuestion};

use crate::segment::{QuestionBlock, question_blocks, strip_numbering};

/// Questions shorter than this are assumed to wrap onto following lines.
const MIN_QUESTION_CHARS: usize = 10;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches `a) text` or `B. text`.
static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([a-d])[.)]\s*(\S.*)$").expect("option regex")
});

/// Letter run following an answer keyword: `b`, `a, c`, `a;b;d`.
const ANSWER_LETTERS: &str = r"\s*([a-d](?:\s*[,;]\s*[a-d])*)\b";

static ANSWER_FR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:Réponse|Réponses|Correct|Bonne réponse)s?\s*:{ANSWER_LETTERS}"
    ))
    .expect("french answer regex")
});

static ANSWER_EN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:Answer|Answers|Correct|Solution)s?\s*:{ANSWER_LETTERS}"
    ))
    .expect("english answer regex")
});

static ANSWER_ES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:Respuesta|Respuestas|Correcto)s?\s*:{ANSWER_LETTERS}"
    ))
    .expect("spanish answer regex")
});

fn answer_regex(language: Language) -> &'static Regex {
    match language {
        Language::Fr => &ANSWER_FR_RE,
        Language::En => &ANSWER_EN_RE,
        Language::Es => &ANSWER_ES_RE,
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Extract every well-formed question from `text`, in document order.
#[instrument(skip(text), fields(len = text.len()))]
pub fn extract_questions(text: &str, language: Language) -> Vec<QcmQuestion> {
    let blocks = question_blocks(text);
    let total = blocks.len();

    let questions: Vec<QcmQuestion> = blocks
        .iter()
        .filter_map(|block| {
            let parsed = parse_block(block, language);
            if parsed.is_none() {
                trace!(number = block.number, "dropping incomplete question block");
            }
            parsed
        })
        .collect();

    debug!(
        blocks = total,
        questions = questions.len(),
        %language,
        "QCM parsing complete"
    );
    questions
}

/// Parse a single block into a question, or `None` when it is incomplete.
pub fn parse_block(block: &QuestionBlock<'_>, language: Language) -> Option<QcmQuestion> {
    let first_line = block.lines.first()?;
    let mut question_text = strip_numbering(first_line).to_string();

    let mut options = BTreeMap::new();
    let mut first_option_idx = None;
    for (i, line) in block.lines.iter().enumerate() {
        if let Some(caps) = OPTION_RE.captures(line) {
            let letter = caps[1].chars().next()?.to_ascii_lowercase();
            options.insert(letter, caps[2].trim().to_string());
            first_option_idx.get_or_insert(i);
        }
    }

    // A short first line is usually the head of a question wrapped over
    // several lines: take everything up to the first option instead.
    if question_text.chars().count() < MIN_QUESTION_CHARS {
        if let Some(first_option) = first_option_idx {
            question_text = block.lines[..first_option]
                .iter()
                .map(|line| strip_numbering(line))
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    let raw_text = block.text();
    let correct_answers = find_answers(&raw_text, language);

    QcmQuestion::new(block.number, question_text, options, correct_answers, raw_text)
}

/// Letters listed after the language's answer keyword, lower-cased, in order.
fn find_answers(block_text: &str, language: Language) -> Vec<char> {
    answer_regex(language)
        .captures(block_text)
        .map(|caps| {
            caps[1]
                .chars()
                .filter(char::is_ascii_alphabetic)
                .map(|c| c.to_ascii_lowercase())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPITAL: &str = "1. What is the capital of France?\na) London\nb) Paris\nc) Berlin\nd) Madrid\nAnswer: b";

    #[test]
    fn parses_english_block() {
        let questions = extract_questions(CAPITAL, Language::En);
        assert_eq!(questions.len(), 1);

        let q = &questions[0];
        assert_eq!(q.number(), 1);
        assert_eq!(q.question_text(), "What is the capital of France?");
        assert_eq!(q.options().len(), 4);
        assert_eq!(q.options()[&'b'], "Paris");
        assert_eq!(q.correct_answers(), ['b']);
        assert_eq!(q.raw_text(), CAPITAL);
    }

    #[test]
    fn answer_keyword_depends_on_language() {
        assert!(extract_questions(CAPITAL, Language::Fr).is_empty());

        let fr = "2) Quelle est la couleur du ciel ?\nA. Bleu\nB. Vert\nC. Rouge\nRÉPONSES : A ; c";
        let questions = extract_questions(fr, Language::Fr);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].number(), 2);
        assert_eq!(questions[0].correct_answers(), ['a', 'c']);
        assert_eq!(questions[0].options()[&'a'], "Bleu");

        let es = "3. ¿Cuál es la capital de España?\na) Madrid\nb) Lisboa\nRespuesta: a";
        let questions = extract_questions(es, Language::Es);
        assert_eq!(questions[0].correct_answers(), ['a']);
    }

    #[test]
    fn short_first_line_joins_wrapped_question() {
        let text = "4. Which\nplanet is known as\nthe red planet?\na) Mars\nb) Venus\nAnswer: a";
        let questions = extract_questions(text, Language::En);
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[0].question_text(),
            "Which planet is known as the red planet?"
        );
    }

    #[test]
    fn malformed_blocks_are_skipped() {
        let text = "\
1. A question with a single option only?
a) Lonely
Answer: a
2. A question without any answer line?
a) One
b) Two
3. A complete question for once?
a) Yes
b) No
Answer: b";
        let questions = extract_questions(text, Language::En);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].number(), 3);
    }

    #[test]
    fn answer_word_is_not_a_letter_run() {
        let text = "1. Name the largest ocean on Earth?\na) Pacific\nb) Atlantic\nAnswer: about the Pacific";
        assert!(extract_questions(text, Language::En).is_empty());
    }

    #[test]
    fn multiple_answers_keep_source_order() {
        let text = "5. Which of these are prime numbers?\na) 2\nb) 4\nc) 5\nd) 9\nAnswers: c, a";
        let questions = extract_questions(text, Language::En);
        assert_eq!(questions[0].correct_answers(), ['c', 'a']);
    }
}
