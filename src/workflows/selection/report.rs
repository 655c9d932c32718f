use serde::Serialize;

use super::domain::{Candidate, ProfileKey, CANDIDATE_COUNT};
use super::ranking::{is_practical_tie, rank};
use super::scoring::{evaluate_all, ScoredCandidate};

/// Leaders for one role profile among the completed interviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileLeaderboard {
    pub key: ProfileKey,
    pub label: &'static str,
    pub leaders: Vec<ScoredCandidate>,
    /// Top two sit inside the practical-tie band.
    pub tied_at_top: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingBoard {
    pub completed: usize,
    pub remaining: usize,
    pub ready_to_plan: bool,
    pub profiles: Vec<ProfileLeaderboard>,
    pub overall: Vec<ScoredCandidate>,
}

impl RankingBoard {
    pub fn build(candidates: &[Candidate]) -> Self {
        let done: Vec<ScoredCandidate> = evaluate_all(candidates)
            .into_iter()
            .filter(|candidate| candidate.status.is_done())
            .collect();

        let profiles = ProfileKey::roles()
            .into_iter()
            .map(|key| {
                let ranked = rank(&done, key);
                let tied_at_top = match ranked.as_slice() {
                    [first, second, ..] => is_practical_tie(first.score(key), second.score(key)),
                    _ => false,
                };
                ProfileLeaderboard {
                    key,
                    label: key.label(),
                    leaders: ranked.into_iter().take(2).collect(),
                    tied_at_top,
                }
            })
            .collect();

        Self {
            completed: done.len(),
            remaining: CANDIDATE_COUNT.saturating_sub(done.len()),
            ready_to_plan: done.len() == CANDIDATE_COUNT,
            overall: rank(&done, ProfileKey::Geral),
            profiles,
        }
    }
}
