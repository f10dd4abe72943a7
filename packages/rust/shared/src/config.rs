//! Application configuration for Deckwright.
//!
//! User config lives at `~/.deckwright/deckwright.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DeckwrightError, Result};
use crate::types::{CardKind, Language};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "deckwright.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".deckwright";

// ---------------------------------------------------------------------------
// Config structs (matching deckwright.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Multiple-choice question generation.
    #[serde(default)]
    pub qcm: QcmConfig,

    /// Course-material generation.
    #[serde(default)]
    pub course: CourseConfig,

    /// Note type names on the flashcard store.
    #[serde(default)]
    pub models: ModelsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Language of the source documents.
    #[serde(default)]
    pub language: Language,

    /// Target deck name.
    #[serde(default = "default_deck")]
    pub deck: String,

    /// Tags added to every generated note.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Upper bound on concepts kept per document.
    #[serde(default = "default_max_concepts")]
    pub max_concepts: usize,

    /// Choose basic or cloze per concept.
    #[serde(default = "default_true")]
    pub mix_types: bool,

    /// Card kind the caller prefers when not mixing.
    #[serde(default)]
    pub preferred_kind: CardKind,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            deck: default_deck(),
            tags: Vec::new(),
            max_concepts: default_max_concepts(),
            mix_types: true,
            preferred_kind: CardKind::default(),
        }
    }
}

fn default_deck() -> String {
    "Default".into()
}
fn default_max_concepts() -> usize {
    100
}
fn default_true() -> bool {
    true
}

/// `[qcm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcmConfig {
    /// Keep at most this many questions (all when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_questions: Option<usize>,

    /// Tag appended to every QCM note.
    #[serde(default = "default_qcm_tag")]
    pub tag: String,
}

impl Default for QcmConfig {
    fn default() -> Self {
        Self {
            max_questions: None,
            tag: default_qcm_tag(),
        }
    }
}

fn default_qcm_tag() -> String {
    "qcm".into()
}

/// `[course]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    /// Let the advisor pick the card count.
    #[serde(default)]
    pub auto_count: bool,

    /// Card count used when not auto-counting.
    #[serde(default = "default_max_cards")]
    pub max_cards: usize,

    /// Tags appended to every course note.
    #[serde(default = "default_course_tags")]
    pub tags: Vec<String>,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            auto_count: false,
            max_cards: default_max_cards(),
            tags: default_course_tags(),
        }
    }
}

fn default_max_cards() -> usize {
    10
}
fn default_course_tags() -> Vec<String> {
    vec!["course".into(), "pdf-generated".into()]
}

/// `[models]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_basic_model")]
    pub basic: String,
    #[serde(default = "default_cloze_model")]
    pub cloze: String,
    #[serde(default = "default_basic_front")]
    pub basic_front: String,
    #[serde(default = "default_basic_back")]
    pub basic_back: String,
    #[serde(default = "default_cloze_text")]
    pub cloze_text: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            basic: default_basic_model(),
            cloze: default_cloze_model(),
            basic_front: default_basic_front(),
            basic_back: default_basic_back(),
            cloze_text: default_cloze_text(),
        }
    }
}

fn default_basic_model() -> String {
    "Basic".into()
}
fn default_cloze_model() -> String {
    "Cloze".into()
}
fn default_basic_front() -> String {
    "Front".into()
}
fn default_basic_back() -> String {
    "Back".into()
}
fn default_cloze_text() -> String {
    "Text".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.deckwright/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DeckwrightError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.deckwright/deckwright.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DeckwrightError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DeckwrightError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DeckwrightError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DeckwrightError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DeckwrightError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("max_concepts"));
        assert!(toml_str.contains("pdf-generated"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.max_concepts, 100);
        assert_eq!(parsed.defaults.language, Language::Fr);
        assert_eq!(parsed.models.cloze, "Cloze");
        assert!(parsed.defaults.mix_types);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
language = "en"
deck = "Biology"
preferred_kind = "cloze"

[qcm]
max_questions = 20
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.language, Language::En);
        assert_eq!(config.defaults.deck, "Biology");
        assert_eq!(config.defaults.preferred_kind, CardKind::Cloze);
        assert_eq!(config.qcm.max_questions, Some(20));
        assert_eq!(config.qcm.tag, "qcm");
        assert_eq!(config.course.max_cards, 10);
    }

    #[test]
    fn load_config_from_reports_parse_errors() {
        let path = std::env::temp_dir().join("deckwright-bad-config.toml");
        std::fs::write(&path, "[defaults]\nlanguage = \"klingon\"\n").expect("write");
        let err = load_config_from(&path).expect_err("should fail");
        assert!(err.to_string().contains("failed to parse"));
        let _ = std::fs::remove_file(&path);
    }
}
