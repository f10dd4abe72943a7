//! Block segmentation of raw extracted text.
//!
//! Two views over the same input:
//! - [`question_blocks`] splits the text into numbered question blocks (QCM path)
//! - [`source_lines`] walks trimmed lines with an estimated page number (concept path)

use std::sync::LazyLock;

use regex::Regex;

/// Average words per printed page, used when no authoritative page count exists.
pub const WORDS_PER_PAGE: usize = 300;

/// Matches a question-start line: `12. ...` or `12) ...`.
pub(crate) static QUESTION_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)[.)]\s+").expect("question start regex")
});

// ---------------------------------------------------------------------------
// Question blocks
// ---------------------------------------------------------------------------

/// Lines from one question start up to the next start (or end of document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock<'a> {
    /// Number printed in front of the question.
    pub number: u32,
    /// Block lines, the question-start line first.
    pub lines: Vec<&'a str>,
}

impl QuestionBlock<'_> {
    /// The block re-joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Split `text` into ordered question blocks.
///
/// Text before the first question start is ignored.
pub fn question_blocks(text: &str) -> Vec<QuestionBlock<'_>> {
    let lines: Vec<&str> = text.lines().collect();

    let starts: Vec<(usize, u32)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let caps = QUESTION_START_RE.captures(line)?;
            // Oversized numbers still start a block.
            let number = caps[1].parse::<u32>().unwrap_or(u32::MAX);
            Some((i, number))
        })
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(idx, &(start, number))| {
            let end = starts.get(idx + 1).map_or(lines.len(), |&(next, _)| next);
            QuestionBlock {
                number,
                lines: lines[start..end].to_vec(),
            }
        })
        .collect()
}

/// Remove leading `N.` / `N)` numbering from a line and trim it.
pub fn strip_numbering(line: &str) -> &str {
    match QUESTION_START_RE.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

// ---------------------------------------------------------------------------
// Source lines
// ---------------------------------------------------------------------------

/// A trimmed, non-empty line with the page it most likely came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    /// 1-based page estimate from the running word count.
    pub page_number: usize,
}

/// Iterate over trimmed non-empty lines, tagging each with an estimated page.
pub fn source_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let mut words_before = 0usize;
    text.lines().filter_map(move |line| {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let page_number = words_before / WORDS_PER_PAGE + 1;
        words_before += trimmed.split_whitespace().count();
        Some(SourceLine {
            text: trimmed,
            page_number,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_numbered_starts() {
        let text = "Intro text\n1. First?\na) x\n2) Second?\nb) y\nc) z";
        let blocks = question_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].number, 1);
        assert_eq!(blocks[0].lines, vec!["1. First?", "a) x"]);
        assert_eq!(blocks[1].number, 2);
        assert_eq!(blocks[1].text(), "2) Second?\nb) y\nc) z");
    }

    #[test]
    fn oversized_number_saturates() {
        let text = "1. First?\na) x\n99999999999. Second?\nb) y";
        let blocks = question_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines, vec!["1. First?", "a) x"]);
        assert_eq!(blocks[1].number, u32::MAX);
        assert_eq!(blocks[1].lines, vec!["99999999999. Second?", "b) y"]);
    }

    #[test]
    fn numbering_needs_trailing_whitespace() {
        assert!(question_blocks("1.5 is a number\n2024.").is_empty());
    }

    #[test]
    fn strip_numbering_handles_both_delimiters() {
        assert_eq!(strip_numbering("  3) What is it?  "), "What is it?");
        assert_eq!(strip_numbering("12. Which one"), "Which one");
        assert_eq!(strip_numbering("continued line"), "continued line");
    }

    #[test]
    fn source_lines_estimate_pages() {
        let first = "word ".repeat(WORDS_PER_PAGE);
        let text = format!("{first}\n\n   \nsecond page line\nthird");
        let lines: Vec<_> = source_lines(&text).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].page_number, 1);
        assert_eq!(lines[1].text, "second page line");
        assert_eq!(lines[1].page_number, 2);
        assert_eq!(lines[2].page_number, 2);
    }
}
