//! Shared types, error model, and configuration for Deckwright.
//!
//! This crate is the foundation depended on by all other Deckwright crates.
//! It provides:
//! - [`DeckwrightError`], the unified error type
//! - Domain types ([`QcmQuestion`], [`ConceptIndicator`], [`DocumentAnalysis`],
//!   [`CardCountSuggestion`], [`CardPayload`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CourseConfig, DefaultsConfig, ModelsConfig, QcmConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DeckwrightError, Result, text_sample};
pub use types::{
    CardContent, CardCountSuggestion, CardKind, CardPayload, ConceptIndicator, ConceptKind,
    DocumentAnalysis, ImportanceFactors, Language, QcmQuestion,
};
