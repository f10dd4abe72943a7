//! Pipeline orchestration for Deckwright.
//!
//! This crate ties together extraction, analysis and rendering into the QCM,
//! course and free-text workflows, then maps the resulting cards onto store
//! notes and hands them to a [`sink::CardSink`].

pub mod notes;
pub mod pipeline;
pub mod sink;
pub mod validation;

pub use notes::{NoteInput, build_notes};
pub use pipeline::{
    AnalysisSummary, CourseOptions, CourseRun, DEFAULT_MAX_CARDS, ProgressReporter, QcmOptions,
    QcmRun, RenderedQuestion, SilentProgress, TextOptions, generate_cloze_cards,
    generate_course_cards, generate_qcm_cards, generate_text_cards,
};
pub use sink::{CardSink, JsonExportSink, SubmitSummary, source_sha256, submit_cards, submit_notes};
pub use validation::{Catalog, LookupCache, NoteValidator, StaticCatalog};
