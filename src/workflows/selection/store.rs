//! Versioned persistence of the selection state.
//!
//! Stored documents are never migrated. A version mismatch or an unreadable
//! document puts the panel back to its defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::domain::{
    default_roster, Candidate, CandidateId, FinalOrderEntry, InterviewStatus, ProjectSettings,
    RawScores, CANDIDATE_COUNT,
};
use super::final_order::validate_final_order;

/// Schema version written with every saved document.
pub const STATE_VERSION: u64 = 2;

/// Default file name for the JSON store.
pub const DEFAULT_STATE_FILE: &str = "pj_app_data_v2.json";

/// Everything the panel persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub version: u64,
    pub project: ProjectSettings,
    pub candidates: Vec<Candidate>,
    pub final_order: Vec<FinalOrderEntry>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            project: ProjectSettings::default(),
            candidates: default_roster(),
            final_order: Vec::new(),
        }
    }
}

/// How a stored document was turned into state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    Reset(ResetReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetReason {
    Corrupt(String),
    VersionMismatch { found: Option<u64> },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredCandidate {
    id: Option<String>,
    name: Option<String>,
    scores: Option<RawScores>,
    notes: Option<String>,
    status: Option<InterviewStatus>,
}

impl StoredCandidate {
    fn into_candidate(self, index: usize) -> Candidate {
        let mut scores = self.scores.unwrap_or_default();
        scores.retain_known();

        Candidate {
            id: non_empty(self.id)
                .map(CandidateId)
                .unwrap_or_else(|| CandidateId::for_slot(index)),
            name: non_empty(self.name).unwrap_or_else(|| "Sem Nome".to_string()),
            scores,
            notes: self.notes.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// Decode a stored document, applying the reset and repair rules.
pub fn decode_state(raw: &str) -> (SelectionState, LoadOutcome) {
    let document: Value = match serde_json::from_str(raw) {
        Ok(document) => document,
        Err(err) => {
            return (
                SelectionState::default(),
                LoadOutcome::Reset(ResetReason::Corrupt(err.to_string())),
            )
        }
    };

    let version = document.get("version").and_then(Value::as_u64);
    if version != Some(STATE_VERSION) {
        return (
            SelectionState::default(),
            LoadOutcome::Reset(ResetReason::VersionMismatch { found: version }),
        );
    }

    let project = document
        .get("project")
        .cloned()
        .and_then(|value| serde_json::from_value::<ProjectSettings>(value).ok())
        .unwrap_or_default();

    let candidates = document
        .get("candidates")
        .cloned()
        .and_then(|value| serde_json::from_value::<Vec<StoredCandidate>>(value).ok())
        .filter(|stored| stored.len() == CANDIDATE_COUNT)
        .map(|stored| {
            stored
                .into_iter()
                .enumerate()
                .map(|(index, candidate)| candidate.into_candidate(index))
                .collect()
        })
        .unwrap_or_else(default_roster);

    let final_order = document
        .get("finalOrder")
        .cloned()
        .and_then(|value| serde_json::from_value::<Vec<FinalOrderEntry>>(value).ok())
        .filter(|entries| validate_final_order(entries, &candidates).is_empty())
        .unwrap_or_default();

    let state = SelectionState {
        version: STATE_VERSION,
        project,
        candidates,
        final_order,
    };
    (state, LoadOutcome::Restored)
}

/// Storage abstraction so the service can run against files or memory.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<SelectionState, StoreError>;
    fn save(&self, state: &SelectionState) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("state store unavailable: {0}")]
    Unavailable(String),
}

fn restore<S: StateStore + ?Sized>(
    store: &S,
    raw: Option<String>,
) -> Result<SelectionState, StoreError> {
    let Some(raw) = raw else {
        return Ok(SelectionState::default());
    };

    let (state, outcome) = decode_state(&raw);
    match outcome {
        LoadOutcome::Reset(ResetReason::VersionMismatch { found }) => {
            warn!(?found, expected = STATE_VERSION, "stale state version, resetting");
            store.clear()?;
        }
        LoadOutcome::Reset(ResetReason::Corrupt(detail)) => {
            warn!(%detail, "unreadable state document, starting from defaults");
        }
        LoadOutcome::Restored => {}
    }
    Ok(state)
}

/// JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file written first and renamed over the document, so a crash mid-write
    /// leaves the previous document intact.
    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<SelectionState, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };
        restore(self, raw)
    }

    fn save(&self, state: &SelectionState) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(state)?;
        let staging = self.staging_path();
        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps the encoded document in memory; used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    document: Mutex<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(raw.into())),
        }
    }

    pub fn with_state(state: SelectionState) -> Self {
        let raw = serde_json::to_string(&state).ok();
        Self {
            document: Mutex::new(raw),
        }
    }

    /// Currently stored document, if any.
    pub fn raw(&self) -> Option<String> {
        self.document.lock().ok().and_then(|guard| guard.clone())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StoreError> {
        self.document
            .lock()
            .map_err(|_| StoreError::Unavailable("state mutex poisoned".to_string()))
    }
}

impl StateStore for InMemoryStore {
    fn load(&self) -> Result<SelectionState, StoreError> {
        let raw = self.guard()?.clone();
        restore(self, raw)
    }

    fn save(&self, state: &SelectionState) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(state)?;
        *self.guard()? = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.guard()? = None;
        Ok(())
    }
}
