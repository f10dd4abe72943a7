//! Heuristic quality review of a rendered card.

use std::fmt;

use serde::Serialize;

use deckwright_shared::{CardContent, CardKind, CardPayload};

const YES_NO_STARTERS: &[&str] = &[
    "is ", "are ", "was ", "were ", "do ", "does ", "did ", "can ", "will ",
];

const VAGUE_TERMS: &[&str] = &["thing", "stuff", "etc", "something", "and so on", "whatever"];

const RECOMMENDATIONS: &[&str] = &[
    "Keep questions specific and unambiguous",
    "One concept per card",
    "Use active recall (avoid yes/no questions)",
    "Include context when needed",
];

/// Coarse rating derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Quality {
    fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        f.write_str(s)
    }
}

/// Outcome of [`check_card_quality`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    /// `true` when no blocking issue was found.
    pub valid: bool,
    /// 0..=100.
    pub score: u8,
    pub quality: Quality,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Running tally while checks are applied.
#[derive(Default)]
struct Review {
    penalty: u32,
    issues: Vec<String>,
    warnings: Vec<String>,
}

impl Review {
    fn issue(&mut self, message: impl Into<String>, penalty: u32) {
        self.issues.push(message.into());
        self.penalty += penalty;
    }

    fn warn(&mut self, message: impl Into<String>, penalty: u32) {
        self.warnings.push(message.into());
        self.penalty += penalty;
    }

    fn finish(self) -> QualityReport {
        let score = 100u32.saturating_sub(self.penalty) as u8;
        QualityReport {
            valid: self.issues.is_empty(),
            score,
            quality: Quality::from_score(score),
            issues: self.issues,
            warnings: self.warnings,
            recommendations: if score < 90 {
                RECOMMENDATIONS.iter().map(|r| r.to_string()).collect()
            } else {
                Vec::new()
            },
        }
    }
}

/// Score a card against common flashcard-writing guidelines.
///
/// For cloze cards `front` is the cloze text and `back` is usually empty; an
/// empty back skips the answer-side checks.
pub fn check_card_quality(front: &str, back: &str, kind: CardKind) -> QualityReport {
    let mut review = Review::default();
    let check_back = kind == CardKind::Basic || !back.is_empty();

    let front_len = front.chars().count();
    if front_len < 5 {
        review.issue("Question is too short", 20);
    } else if front_len > 200 {
        review.warn("Question is quite long - consider splitting", 5);
    }

    if check_back {
        let back_len = back.chars().count();
        if back_len < 3 {
            review.issue("Answer is too short", 20);
        } else if back_len > 500 {
            review.warn("Answer is long - consider multiple cards", 5);
        }

        if front.to_lowercase() == back.to_lowercase() {
            review.issue("Question and answer are identical", 30);
        }
    }

    if front.trim().is_empty() || (check_back && back.trim().is_empty()) {
        review.issue("Empty content detected", 50);
    }

    if !front.ends_with(['?', '.', ':']) {
        review.warn("Question doesn't end with punctuation", 2);
    }

    let front_lower = front.to_lowercase();
    let back_lower = back.to_lowercase();
    if YES_NO_STARTERS.iter().any(|s| front_lower.starts_with(s)) {
        review.warn("Yes/no questions are less effective for learning", 5);
    }

    if let Some(term) = VAGUE_TERMS
        .iter()
        .find(|term| front_lower.contains(*term) || back_lower.contains(*term))
    {
        review.warn(format!("Contains vague term: '{term}'"), 5);
    }

    if kind == CardKind::Cloze {
        let deletions = front.matches("{{c1::").count();
        if deletions == 0 {
            review.issue("Cloze card missing {{c1::...}} syntax", 30);
        } else if deletions > 3 {
            review.warn("Too many cloze deletions in one card", 10);
        }
    }

    review.finish()
}

/// [`check_card_quality`] for a rendered payload.
pub fn check_payload(card: &CardPayload) -> QualityReport {
    match &card.content {
        CardContent::Basic { front, back } => check_card_quality(front, back, CardKind::Basic),
        CardContent::Cloze { text } => check_card_quality(text, "", CardKind::Cloze),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_question_is_excellent() {
        let report = check_card_quality(
            "Qu'est-ce que Python ?",
            "Un langage de programmation",
            CardKind::Basic,
        );
        assert!(report.valid);
        assert_eq!(report.score, 100);
        assert_eq!(report.quality, Quality::Excellent);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn penalties_accumulate() {
        // too short (20) + identical (30) + no punctuation (2)
        let report = check_card_quality("Why", "why", CardKind::Basic);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.score, 48);
        assert_eq!(report.quality, Quality::Poor);
        assert_eq!(report.recommendations.len(), 4);
    }

    #[test]
    fn yes_no_and_vague_terms_warn_once() {
        let report = check_card_quality(
            "Is this a thing or stuff?",
            "Something, etc.",
            CardKind::Basic,
        );
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[1].contains("'thing'"));
        assert_eq!(report.score, 90);
    }

    #[test]
    fn score_floors_at_zero() {
        let report = check_card_quality("", "", CardKind::Cloze);
        assert_eq!(report.score, 0);
        assert_eq!(report.quality.to_string(), "poor");
    }

    #[test]
    fn cloze_checks() {
        let card = CardPayload::cloze("In {{c1::1991}}, Python reached {{c2::10%}} adoption.");
        let report = check_payload(&card);
        assert!(report.valid, "{report:?}");
        assert_eq!(report.score, 100);

        let report = check_card_quality("No deletion in this text.", "", CardKind::Cloze);
        assert!(!report.valid);
        assert_eq!(report.score, 70);

        let crowded = "{{c1::a}} {{c1::b}} {{c1::c}} {{c1::d}}.";
        let report = check_card_quality(crowded, "", CardKind::Cloze);
        assert_eq!(report.score, 90);
    }
}
