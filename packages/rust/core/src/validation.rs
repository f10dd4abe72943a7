//! Request-scoped note validation against the flashcard store schema.
//!
//! The store schema is read through a [`Catalog`]. Lookups are memoized in a
//! [`LookupCache`] owned by the caller, so a cache lives exactly as long as the
//! request that created it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use deckwright_shared::{DeckwrightError, ModelsConfig, Result};

use crate::notes::NoteInput;

/// Names listed in a suggestion before the remainder is summarized.
const SUGGESTION_LIMIT: usize = 5;

/// Models worth pointing out when a model name is wrong.
const COMMON_MODELS: &[&str] = &["Basic", "Cloze", "Basic (and reversed card)"];

/// Read access to the store's decks and note models.
pub trait Catalog {
    fn deck_names(&self) -> Result<Vec<String>>;
    fn model_names(&self) -> Result<Vec<String>>;
    /// Field names of `model`, in model order.
    fn model_field_names(&self, model: &str) -> Result<Vec<String>>;
}

/// Memoized catalog lookups for one request.
#[derive(Debug, Default)]
pub struct LookupCache {
    decks: Option<Vec<String>>,
    models: Option<Vec<String>>,
    fields: HashMap<String, Vec<String>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Validates notes before submission.
pub struct NoteValidator<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    cache: &'a mut LookupCache,
}

impl<'a, C: Catalog + ?Sized> NoteValidator<'a, C> {
    pub fn new(catalog: &'a C, cache: &'a mut LookupCache) -> Self {
        Self { catalog, cache }
    }

    /// Fail unless `deck` exists.
    pub fn validate_deck(&mut self, deck: &str) -> Result<()> {
        if self.cache.decks.is_none() {
            self.cache.decks = Some(self.catalog.deck_names()?);
        }
        let decks = self.cache.decks.as_deref().unwrap_or_default();
        if decks.iter().any(|d| d == deck) {
            return Ok(());
        }

        let mut suggestions = name_suggestions("Available decks", decks);
        suggestions.push("Tip: create the deck first or pick an existing one".into());
        Err(DeckwrightError::validation(
            format!("Deck '{deck}' does not exist"),
            suggestions,
        ))
    }

    /// Fail unless `model` exists; returns its field names.
    pub fn validate_model(&mut self, model: &str) -> Result<Vec<String>> {
        if let Some(fields) = self.cache.fields.get(model) {
            return Ok(fields.clone());
        }

        if self.cache.models.is_none() {
            self.cache.models = Some(self.catalog.model_names()?);
        }
        let models = self.cache.models.as_deref().unwrap_or_default();
        if !models.iter().any(|m| m == model) {
            let common: Vec<&str> = COMMON_MODELS
                .iter()
                .copied()
                .filter(|c| models.iter().any(|m| m == c))
                .collect();
            let mut suggestions = Vec::new();
            if !common.is_empty() {
                suggestions.push(format!("Common models: {}", common.join(", ")));
            }
            suggestions.extend(name_suggestions("All available", models));
            return Err(DeckwrightError::validation(
                format!("Model '{model}' does not exist"),
                suggestions,
            ));
        }

        let fields = self.catalog.model_field_names(model)?;
        debug!(model, fields = fields.len(), "cached model fields");
        self.cache.fields.insert(model.to_string(), fields.clone());
        Ok(fields)
    }

    /// Fail on missing, unknown, or empty fields for `model`.
    pub fn validate_fields(&mut self, model: &str, fields: &BTreeMap<String, String>) -> Result<()> {
        let required = self.validate_model(model)?;
        let required_set: BTreeSet<&str> = required.iter().map(String::as_str).collect();
        let provided_set: BTreeSet<&str> = fields.keys().map(String::as_str).collect();

        let missing: Vec<&str> = required_set.difference(&provided_set).copied().collect();
        if !missing.is_empty() {
            return Err(DeckwrightError::validation(
                format!("Missing required fields: {}", missing.join(", ")),
                vec![format!("Model '{model}' requires: {}", required.join(", "))],
            ));
        }

        let unknown: Vec<&str> = provided_set.difference(&required_set).copied().collect();
        if !unknown.is_empty() {
            return Err(DeckwrightError::validation(
                format!("Unknown fields: {}", unknown.join(", ")),
                vec![
                    format!("Valid fields for '{model}': {}", required.join(", ")),
                    "Tip: check for typos in field names".into(),
                ],
            ));
        }

        let empty: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        if !empty.is_empty() {
            return Err(DeckwrightError::validation(
                format!("Empty or whitespace-only fields: {}", empty.join(", ")),
                vec![
                    "All fields must contain meaningful content".into(),
                    "Provide text for each field".into(),
                ],
            ));
        }

        Ok(())
    }

    /// Deck first, then model and fields.
    pub fn validate_note(&mut self, note: &NoteInput) -> Result<()> {
        self.validate_deck(&note.deck_name)?;
        self.validate_fields(&note.model_name, &note.fields)
    }
}

/// `"<label>: a, b, c, d, e"` plus `"... and N more"` past the limit.
fn name_suggestions(label: &str, names: &[String]) -> Vec<String> {
    let shown: Vec<&str> = names
        .iter()
        .take(SUGGESTION_LIMIT)
        .map(String::as_str)
        .collect();
    let mut suggestions = vec![format!("{label}: {}", shown.join(", "))];
    if names.len() > SUGGESTION_LIMIT {
        suggestions.push(format!("... and {} more", names.len() - SUGGESTION_LIMIT));
    }
    suggestions
}

// ---------------------------------------------------------------------------
// Static catalog
// ---------------------------------------------------------------------------

/// In-memory catalog for offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    decks: Vec<String>,
    models: Vec<(String, Vec<String>)>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(mut self, deck: impl Into<String>) -> Self {
        self.decks.push(deck.into());
        self
    }

    pub fn with_model<I, S>(mut self, model: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models
            .push((model.into(), fields.into_iter().map(Into::into).collect()));
        self
    }

    /// A catalog holding `deck` and the basic and cloze models from config.
    pub fn from_models(deck: &str, models: &ModelsConfig) -> Self {
        Self::new()
            .with_deck(deck)
            .with_model(
                models.basic.as_str(),
                [models.basic_front.as_str(), models.basic_back.as_str()],
            )
            .with_model(models.cloze.as_str(), [models.cloze_text.as_str()])
    }
}

impl Catalog for StaticCatalog {
    fn deck_names(&self) -> Result<Vec<String>> {
        Ok(self.decks.clone())
    }

    fn model_names(&self) -> Result<Vec<String>> {
        Ok(self.models.iter().map(|(name, _)| name.clone()).collect())
    }

    fn model_field_names(&self, model: &str) -> Result<Vec<String>> {
        self.models
            .iter()
            .find(|(name, _)| name == model)
            .map(|(_, fields)| fields.clone())
            .ok_or_else(|| {
                DeckwrightError::validation(format!("Model '{model}' does not exist"), Vec::new())
            })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts catalog round-trips.
    struct CountingCatalog {
        inner: StaticCatalog,
        calls: Cell<usize>,
    }

    impl Catalog for CountingCatalog {
        fn deck_names(&self) -> Result<Vec<String>> {
            self.calls.set(self.calls.get() + 1);
            self.inner.deck_names()
        }
        fn model_names(&self) -> Result<Vec<String>> {
            self.calls.set(self.calls.get() + 1);
            self.inner.model_names()
        }
        fn model_field_names(&self, model: &str) -> Result<Vec<String>> {
            self.calls.set(self.calls.get() + 1);
            self.inner.model_field_names(model)
        }
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::from_models("Default", &ModelsConfig::default())
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unknown_deck_lists_first_five() {
        let catalog = (1..=7).fold(StaticCatalog::new(), |c, i| c.with_deck(format!("Deck{i}")));
        let mut cache = LookupCache::new();
        let mut validator = NoteValidator::new(&catalog, &mut cache);

        let err = validator.validate_deck("Bio").unwrap_err();
        assert!(
            err.to_string()
                .starts_with("validation error: Deck 'Bio' does not exist\n  - Available decks:")
        );
        let suggestions = err.suggestions();
        assert_eq!(suggestions[0], "Available decks: Deck1, Deck2, Deck3, Deck4, Deck5");
        assert_eq!(suggestions[1], "... and 2 more");
        assert!(validator.validate_deck("Deck7").is_ok());
    }

    #[test]
    fn unknown_model_points_at_common_models() {
        let catalog = catalog();
        let mut cache = LookupCache::new();
        let mut validator = NoteValidator::new(&catalog, &mut cache);

        let err = validator.validate_model("Basik").unwrap_err();
        assert_eq!(err.suggestions()[0], "Common models: Basic, Cloze");
        assert_eq!(err.suggestions()[1], "All available: Basic, Cloze");
        assert_eq!(validator.validate_model("Cloze").unwrap(), vec!["Text"]);
    }

    #[test]
    fn field_checks() {
        let catalog = catalog();
        let mut cache = LookupCache::new();
        let mut validator = NoteValidator::new(&catalog, &mut cache);

        let err = validator
            .validate_fields("Basic", &fields(&[("Front", "Q?")]))
            .unwrap_err();
        assert!(err.to_string().contains("Missing required fields: Back"));

        let err = validator
            .validate_fields("Basic", &fields(&[("Front", "Q?"), ("Back", "A"), ("Extra", "x")]))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown fields: Extra"));

        let err = validator
            .validate_fields("Basic", &fields(&[("Front", "Q?"), ("Back", "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains("Empty or whitespace-only fields: Back"));

        assert!(validator
            .validate_fields("Basic", &fields(&[("Front", "Q?"), ("Back", "A")]))
            .is_ok());
    }

    #[test]
    fn lookups_are_cached_per_request() {
        let catalog = CountingCatalog {
            inner: catalog(),
            calls: Cell::new(0),
        };
        let note = NoteInput {
            deck_name: "Default".into(),
            model_name: "Basic".into(),
            fields: fields(&[("Front", "Q?"), ("Back", "A")]),
            tags: Vec::new(),
        };

        let mut cache = LookupCache::new();
        let mut validator = NoteValidator::new(&catalog, &mut cache);
        validator.validate_note(&note).unwrap();
        validator.validate_note(&note).unwrap();
        // decks + models + fields, once each
        assert_eq!(catalog.calls.get(), 3);

        let mut fresh = LookupCache::new();
        NoteValidator::new(&catalog, &mut fresh)
            .validate_note(&note)
            .unwrap();
        assert_eq!(catalog.calls.get(), 6);
    }
}
