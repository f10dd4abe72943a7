//! Card submission: the [`CardSink`] seam and a JSON export implementation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use deckwright_shared::{DeckwrightError, Result};

use crate::notes::NoteInput;
use crate::validation::{Catalog, LookupCache, NoteValidator};

/// Destination for generated notes.
pub trait CardSink {
    /// Submit `notes`, returning one id per note (`None` when that note failed).
    fn submit(&mut self, notes: &[NoteInput]) -> Result<Vec<Option<u64>>>;
}

/// Outcome of [`submit_notes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitSummary {
    pub created: usize,
    pub failed: usize,
    pub note_ids: Vec<u64>,
}

/// Submit `notes` through `sink` and tally the per-note results.
///
/// Fails when a non-empty batch produced no note at all.
#[instrument(skip_all, fields(deck = %deck, notes = notes.len()))]
pub fn submit_notes(
    sink: &mut dyn CardSink,
    notes: &[NoteInput],
    deck: &str,
) -> Result<SubmitSummary> {
    let results = sink.submit(notes)?;
    let note_ids: Vec<u64> = results.iter().flatten().copied().collect();
    let summary = SubmitSummary {
        created: note_ids.len(),
        failed: notes.len().saturating_sub(note_ids.len()),
        note_ids,
    };

    if !notes.is_empty() && summary.created == 0 {
        return Err(DeckwrightError::Submission(format!(
            "failed to create any notes in deck '{deck}'"
        )));
    }
    if summary.failed > 0 {
        warn!(failed = summary.failed, "some notes were not created");
    }

    info!(created = summary.created, "notes submitted");
    Ok(summary)
}

/// Validate `notes` against `catalog`, then submit the valid ones.
///
/// Invalid notes are skipped and counted as failed. When no note is valid the
/// first validation error is returned, suggestions included.
#[instrument(skip_all, fields(deck = %deck, notes = notes.len()))]
pub fn submit_cards(
    sink: &mut dyn CardSink,
    catalog: &dyn Catalog,
    notes: &[NoteInput],
    deck: &str,
) -> Result<SubmitSummary> {
    let mut cache = LookupCache::new();
    let mut validator = NoteValidator::new(catalog, &mut cache);

    let mut valid = Vec::with_capacity(notes.len());
    let mut first_error = None;
    for note in notes {
        match validator.validate_note(note) {
            Ok(()) => valid.push(note.clone()),
            Err(e) => {
                warn!(error = %e, "skipping invalid note");
                first_error.get_or_insert(e);
            }
        }
    }
    if valid.is_empty() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    let mut summary = submit_notes(sink, &valid, deck)?;
    summary.failed += notes.len() - valid.len();
    Ok(summary)
}

/// Hex SHA-256 of the source text, recorded in exports.
pub fn source_sha256(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ExportDocument<'a> {
    generated_at: DateTime<Utc>,
    source_sha256: &'a str,
    deck: &'a str,
    notes: Vec<ExportedNote<'a>>,
}

#[derive(Serialize)]
struct ExportedNote<'a> {
    id: u64,
    #[serde(flatten)]
    note: &'a NoteInput,
}

/// Writes submitted notes to a JSON file for offline import.
///
/// Every call rewrites the file with the latest batch. Ids are sequential per
/// sink, starting at 1.
#[derive(Debug)]
pub struct JsonExportSink {
    path: PathBuf,
    deck: String,
    source_sha256: String,
    next_id: u64,
}

impl JsonExportSink {
    pub fn new(path: impl Into<PathBuf>, deck: impl Into<String>, source_text: &str) -> Self {
        Self {
            path: path.into(),
            deck: deck.into(),
            source_sha256: source_sha256(source_text),
            next_id: 1,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CardSink for JsonExportSink {
    fn submit(&mut self, notes: &[NoteInput]) -> Result<Vec<Option<u64>>> {
        let ids: Vec<u64> = (self.next_id..self.next_id + notes.len() as u64).collect();

        let document = ExportDocument {
            generated_at: Utc::now(),
            source_sha256: &self.source_sha256,
            deck: &self.deck,
            notes: ids
                .iter()
                .zip(notes)
                .map(|(&id, note)| ExportedNote { id, note })
                .collect(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DeckwrightError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&document).map_err(|e| {
            DeckwrightError::Submission(format!("JSON serialization failed: {e}"))
        })?;
        std::fs::write(&self.path, json).map_err(|e| DeckwrightError::io(&self.path, e))?;

        self.next_id += notes.len() as u64;
        debug!(path = %self.path.display(), count = notes.len(), "wrote export file");
        Ok(ids.into_iter().map(Some).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use deckwright_shared::ModelsConfig;

    use super::*;
    use crate::validation::StaticCatalog;

    fn note(front: &str) -> NoteInput {
        NoteInput {
            deck_name: "Default".into(),
            model_name: "Basic".into(),
            fields: BTreeMap::from([
                ("Front".to_string(), front.to_string()),
                ("Back".to_string(), "answer".to_string()),
            ]),
            tags: vec!["qcm".into()],
        }
    }

    /// Fails every other note.
    struct FlakySink;

    impl CardSink for FlakySink {
        fn submit(&mut self, notes: &[NoteInput]) -> Result<Vec<Option<u64>>> {
            Ok((0..notes.len() as u64)
                .map(|i| (i % 2 == 0).then_some(100 + i))
                .collect())
        }
    }

    #[test]
    fn summary_counts_partial_failures() {
        let notes = vec![note("a"), note("b"), note("c")];
        let summary = submit_notes(&mut FlakySink, &notes, "Default").unwrap();
        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.note_ids, vec![100, 102]);
    }

    #[test]
    fn zero_successes_is_an_error() {
        struct RejectAll;
        impl CardSink for RejectAll {
            fn submit(&mut self, notes: &[NoteInput]) -> Result<Vec<Option<u64>>> {
                Ok(vec![None; notes.len()])
            }
        }

        let err = submit_notes(&mut RejectAll, &[note("a")], "Bio").unwrap_err();
        assert!(err.to_string().contains("'Bio'"));

        let summary = submit_notes(&mut RejectAll, &[], "Bio").unwrap();
        assert_eq!(summary.created, 0);
    }

    #[test]
    fn json_export_writes_document() {
        let dir = std::env::temp_dir().join(format!("deckwright-export-{}", std::process::id()));
        let path = dir.join("out").join("cards.json");
        let mut sink = JsonExportSink::new(&path, "Default", "source text");

        let ids = sink.submit(&[note("a"), note("b")]).unwrap();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        let ids = sink.submit(&[note("c")]).unwrap();
        assert_eq!(ids, vec![Some(3)]);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(sink.path()).unwrap()).unwrap();
        assert_eq!(written["deck"], "Default");
        assert_eq!(written["source_sha256"], source_sha256("source text"));
        assert_eq!(written["notes"][0]["id"], 3);
        assert_eq!(written["notes"][0]["modelName"], "Basic");
        assert_eq!(written["notes"][0]["fields"]["Front"], "c");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_notes_are_skipped() {
        let catalog = StaticCatalog::from_models("Default", &ModelsConfig::default());
        let mut blank = note("x");
        blank.fields.insert("Back".into(), " ".into());

        let summary =
            submit_cards(&mut FlakySink, &catalog, &[note("a"), blank], "Default").unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 1);

        let mut elsewhere = note("a");
        elsewhere.deck_name = "Bio".into();
        let err = submit_cards(&mut FlakySink, &catalog, &[elsewhere], "Bio").unwrap_err();
        assert!(!err.suggestions().is_empty());
        assert!(err.to_string().contains("\n  - Available decks: Default"));
    }

    #[test]
    fn sha256_is_hex() {
        let hash = source_sha256("");
        assert_eq!(hash.len(), 64);
        assert!(hash.starts_with("e3b0c442"));
    }
}
