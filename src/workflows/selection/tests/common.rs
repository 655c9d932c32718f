use std::sync::Arc;

use crate::workflows::selection::domain::{
    Candidate, CandidateId, InterviewStatus, ProjectSettings, RawScores,
};
use crate::workflows::selection::store::{InMemoryStore, SelectionState};
use crate::workflows::selection::SelectionService;

pub(crate) fn scores_from(values: [u8; 10]) -> RawScores {
    values
        .into_iter()
        .enumerate()
        .map(|(index, score)| (index as u8 + 1, score))
        .collect()
}

const PANEL: [(&str, [u8; 10]); 10] = [
    ("Ana", [3, 3, 2, 2, 2, 2, 2, 1, 1, 1]),
    ("Bruno", [2, 2, 2, 3, 3, 3, 3, 1, 1, 2]),
    ("Carla", [1, 1, 2, 2, 2, 2, 2, 3, 3, 3]),
    ("Duarte", [2, 1, 1, 1, 1, 1, 1, 1, 1, 1]),
    ("Eva", [3, 2, 2, 3, 2, 2, 2, 2, 2, 2]),
    ("Filipe", [1, 1, 1, 2, 2, 1, 1, 2, 3, 2]),
    ("Gabriela", [2, 2, 3, 2, 2, 3, 2, 2, 2, 2]),
    ("Hugo", [0, 1, 0, 1, 0, 1, 0, 1, 0, 1]),
    ("Inês", [3, 2, 3, 1, 1, 1, 1, 3, 2, 3]),
    ("João", [2, 2, 2, 2, 2, 2, 2, 2, 2, 2]),
];

/// Ten fully interviewed candidates with distinct score profiles.
pub(crate) fn completed_panel() -> Vec<Candidate> {
    PANEL
        .iter()
        .enumerate()
        .map(|(index, (name, scores))| Candidate {
            id: CandidateId::for_slot(index),
            name: name.to_string(),
            scores: scores_from(*scores),
            notes: String::new(),
            status: InterviewStatus::Done,
        })
        .collect()
}

pub(crate) fn completed_state() -> SelectionState {
    SelectionState {
        project: ProjectSettings::default(),
        candidates: completed_panel(),
        ..SelectionState::default()
    }
}

pub(crate) fn service_with(state: SelectionState) -> (SelectionService<InMemoryStore>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::with_state(state));
    (SelectionService::new(store.clone()), store)
}
