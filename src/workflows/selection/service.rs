use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::info;

use super::assignment::{plan_assignment, PlanError};
use super::domain::{
    question, Candidate, CandidateId, InterviewStatus, ProjectSettings, MAX_SCORE,
};
use super::final_order::{self, hydrate, validate_final_order, MoveDirection, PlacedCandidate};
use super::report::RankingBoard;
use super::scoring::evaluate_all;
use super::sheet::ScoreSheet;
use super::store::{SelectionState, StateStore, StoreError};

/// Service composing the state store with the evaluation engine.
///
/// Every call reloads the stored state and recomputes derived scores from it.
/// Calls are serialized on `write_lock` so a load, change and save never
/// interleaves with another request.
pub struct SelectionService<S> {
    store: Arc<S>,
    write_lock: Mutex<()>,
}

/// Final order resolved against the roster, with its validation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalOrderView {
    pub entries: Vec<PlacedCandidate>,
    pub violations: Vec<String>,
    pub ready_for_export: bool,
}

impl<S> SelectionService<S>
where
    S: StateStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn state(&self) -> Result<SelectionState, SelectionServiceError> {
        let _guard = self.lock()?;
        Ok(self.store.load()?)
    }

    pub fn rankings(&self) -> Result<RankingBoard, SelectionServiceError> {
        let state = self.state()?;
        Ok(RankingBoard::build(&state.candidates))
    }

    pub fn update_project(
        &self,
        project: ProjectSettings,
    ) -> Result<ProjectSettings, SelectionServiceError> {
        self.transact(|state| {
            state.project = project.clone();
            Ok(())
        })?;
        Ok(project)
    }

    pub fn rename(&self, id: &CandidateId, name: &str) -> Result<Candidate, SelectionServiceError> {
        self.update_candidate(id, |candidate| {
            candidate.name = name.to_string();
            Ok(())
        })
    }

    pub fn set_notes(
        &self,
        id: &CandidateId,
        notes: &str,
    ) -> Result<Candidate, SelectionServiceError> {
        self.update_candidate(id, |candidate| {
            candidate.notes = notes.to_string();
            Ok(())
        })
    }

    /// Record one rubric score captured during an interview.
    pub fn record_score(
        &self,
        id: &CandidateId,
        question_id: u8,
        score: u8,
    ) -> Result<Candidate, SelectionServiceError> {
        if question(question_id).is_none() {
            return Err(SelectionServiceError::UnknownQuestion(question_id));
        }
        if score > MAX_SCORE {
            return Err(SelectionServiceError::ScoreOutOfRange {
                question: question_id,
                score,
            });
        }

        self.update_candidate(id, |candidate| {
            candidate.scores.set(question_id, score);
            Ok(())
        })
    }

    /// Mark an interview as done. All ten questions must be scored.
    pub fn complete_interview(&self, id: &CandidateId) -> Result<Candidate, SelectionServiceError> {
        self.update_candidate(id, |candidate| {
            if !candidate.scores.is_complete() {
                return Err(SelectionServiceError::InterviewIncomplete {
                    id: candidate.id.clone(),
                    answered: candidate.scores.answered(),
                });
            }
            candidate.status = InterviewStatus::Done;
            Ok(())
        })
    }

    pub fn import_sheet(
        &self,
        sheet: &ScoreSheet,
    ) -> Result<Vec<Candidate>, SelectionServiceError> {
        let candidates = self.transact(|state| {
            sheet.apply(&mut state.candidates);
            Ok(state.candidates.clone())
        })?;
        info!(
            completed = candidates.iter().filter(|candidate| candidate.is_done()).count(),
            "score sheet imported"
        );
        Ok(candidates)
    }

    /// Run the planner and store its suggestion as the new final order.
    pub fn generate_final_order(&self) -> Result<FinalOrderView, SelectionServiceError> {
        self.transact(|state| {
            state.final_order = plan_assignment(&state.candidates)?;
            Ok(Self::view(state))
        })
    }

    pub fn final_order(&self) -> Result<FinalOrderView, SelectionServiceError> {
        let state = self.state()?;
        Ok(Self::view(&state))
    }

    /// Manual adjacent swap; the planner is not re-run.
    pub fn move_entry(
        &self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<FinalOrderView, SelectionServiceError> {
        self.transact(|state| {
            if !final_order::move_entry(&mut state.final_order, index, direction) {
                return Err(SelectionServiceError::InvalidMove { index, direction });
            }
            Ok(Self::view(state))
        })
    }

    /// Drop everything and return to the ten placeholder candidates.
    pub fn reset(&self) -> Result<SelectionState, SelectionServiceError> {
        let _guard = self.lock()?;
        self.store.clear()?;
        info!("selection state reset");
        Ok(SelectionState::default())
    }

    fn update_candidate<F>(
        &self,
        id: &CandidateId,
        apply: F,
    ) -> Result<Candidate, SelectionServiceError>
    where
        F: FnOnce(&mut Candidate) -> Result<(), SelectionServiceError>,
    {
        self.transact(|state| {
            let candidate = state
                .candidates
                .iter_mut()
                .find(|candidate| &candidate.id == id)
                .ok_or_else(|| SelectionServiceError::UnknownCandidate(id.clone()))?;
            apply(candidate)?;
            Ok(candidate.clone())
        })
    }

    /// Load, change and save while holding the write lock. Nothing is saved when `change` fails.
    fn transact<T, F>(&self, change: F) -> Result<T, SelectionServiceError>
    where
        F: FnOnce(&mut SelectionState) -> Result<T, SelectionServiceError>,
    {
        let _guard = self.lock()?;
        let mut state = self.store.load()?;
        let outcome = change(&mut state)?;
        self.store.save(&state)?;
        Ok(outcome)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("selection write lock poisoned".to_string()))
    }

    fn view(state: &SelectionState) -> FinalOrderView {
        let live = final_order::drop_stale(&state.final_order, &state.candidates);
        let violations = validate_final_order(&live, &state.candidates);
        FinalOrderView {
            entries: hydrate(&live, &evaluate_all(&state.candidates)),
            ready_for_export: violations.is_empty(),
            violations,
        }
    }
}

/// Error raised by the selection service.
#[derive(Debug, thiserror::Error)]
pub enum SelectionServiceError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("candidate {0} not found")]
    UnknownCandidate(CandidateId),
    #[error("question {0} is not part of the interview")]
    UnknownQuestion(u8),
    #[error("question {question} scored {score}, rubric allows 0-4")]
    ScoreOutOfRange { question: u8, score: u8 },
    #[error("interview for {id} has {answered} of 10 questions scored")]
    InterviewIncomplete { id: CandidateId, answered: usize },
    #[error("cannot move entry {index} {direction:?}")]
    InvalidMove {
        index: usize,
        direction: MoveDirection,
    },
}
