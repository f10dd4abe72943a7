//! Error types for Deckwright.
//!
//! Library crates use [`DeckwrightError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Deckwright operations.
#[derive(Debug, thiserror::Error)]
pub enum DeckwrightError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source text is empty or holds no extractable characters.
    #[error("source text is empty or contains no extractable text (sample: {sample:?})")]
    EmptyInput { sample: String },

    /// No valid multiple-choice question survived parsing.
    #[error(
        "no valid QCM questions found. Expected numbered questions with a), b), c), d) \
         options and a '{language}' answer indicator (sample: {sample:?})"
    )]
    NoQuestions { language: String, sample: String },

    /// Concept extraction produced nothing usable.
    #[error(
        "could not extract meaningful concepts ({word_count} words, {page_count} pages, \
         density {density_score:.1}). The document may be too short, too general, or \
         poorly structured (sample: {sample:?})"
    )]
    NoConcepts {
        word_count: usize,
        page_count: usize,
        density_score: f64,
        sample: String,
    },

    /// Free text yielded no card candidates.
    #[error("{guidance} (sample: {sample:?})")]
    NoCandidates { guidance: String, sample: String },

    /// Input rejected against the flashcard store schema.
    #[error("validation error: {message}{}", suggestion_lines(.suggestions))]
    Validation {
        message: String,
        suggestions: Vec<String>,
    },

    /// Card submission or export failure.
    #[error("submission error: {0}")]
    Submission(String),

    /// Caller supplied an inconsistent set of options.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DeckwrightError>;

impl DeckwrightError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error with follow-up suggestions.
    pub fn validation(msg: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            suggestions,
        }
    }

    /// Create an invalid-argument error from any displayable message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Suggestions attached to a validation failure, empty otherwise.
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Validation { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

/// Suggestions rendered as an indented list, one per line.
fn suggestion_lines(suggestions: &[String]) -> String {
    suggestions.iter().map(|s| format!("\n  - {s}")).collect()
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
pub fn text_sample(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut sample: String = text.chars().take(max_chars).collect();
        sample.push_str("...");
        sample
    } else {
        text.to_string()
    }
}
