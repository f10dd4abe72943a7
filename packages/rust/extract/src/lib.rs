//! Structural extraction over raw document text.
//!
//! - [`segment`] splits text into question blocks and page-tagged lines
//! - [`qcm`] parses numbered multiple-choice blocks into [`QcmQuestion`]s
//! - [`concepts`] detects definitions, facts and list items in free prose
//!
//! [`QcmQuestion`]: deckwright_shared::QcmQuestion

pub mod concepts;
pub mod qcm;
pub mod segment;

pub use concepts::{DEFAULT_MAX_CONCEPTS, Definition, extract_concepts, split_definition};
pub use qcm::extract_questions;
pub use segment::{QuestionBlock, SourceLine, WORDS_PER_PAGE, question_blocks, source_lines};
