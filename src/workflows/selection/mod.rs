//! Ten-candidate structured interview: scoring, per-role ranking, and final-list assignment.
//!
//! Derived scores are never stored. Every ranking, plan, and validation is
//! recomputed from the raw rubric scores of the current state.

pub mod assignment;
pub mod domain;
pub mod final_order;
pub mod ranking;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod sheet;
pub mod store;

#[cfg(test)]
mod tests;

pub use assignment::{plan_assignment, PlanError};
pub use domain::{
    default_roster, question, rubric_label, Candidate, CandidateId, FinalOrderEntry,
    InterviewStatus, ProfileKey, ProjectSettings, Question, QuestionCategory, RawScores, Role,
    SelectionStrategy, CANDIDATE_COUNT, MAX_SCORE, QUESTIONS,
};
pub use final_order::{
    drop_stale, hydrate, move_entry, validate_final_order, MoveDirection, PlacedCandidate,
};
pub use ranking::{compare, rank, PRACTICAL_TIE_BAND, SCORE_EPSILON};
pub use report::{ProfileLeaderboard, RankingBoard};
pub use router::selection_router;
pub use scoring::{aggregate, evaluate_all, profile, ProfileScores, ScoredCandidate, SubScores};
pub use service::{FinalOrderView, SelectionService, SelectionServiceError};
pub use sheet::{ScoreSheet, ScoreSheetError};
pub use store::{
    decode_state, InMemoryStore, JsonFileStore, LoadOutcome, ResetReason, SelectionState,
    StateStore, StoreError, STATE_VERSION,
};
