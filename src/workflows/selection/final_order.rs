use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{Candidate, CandidateId, FinalOrderEntry, Role, CANDIDATE_COUNT};
use super::scoring::ScoredCandidate;

/// Check a proposed final order against the current roster.
///
/// Returns one message per violation; an empty list means the order can be exported.
pub fn validate_final_order(entries: &[FinalOrderEntry], candidates: &[Candidate]) -> Vec<String> {
    let mut violations = Vec::new();

    if entries.len() != CANDIDATE_COUNT {
        violations.push(format!(
            "final order must contain exactly {CANDIDATE_COUNT} candidates, found {}",
            entries.len()
        ));
    }

    let known: HashSet<&CandidateId> = candidates.iter().map(|candidate| &candidate.id).collect();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for entry in entries {
        if !known.contains(&entry.id) {
            violations.push(format!("candidate {} does not exist", entry.id));
        } else if !seen.insert(&entry.id) && reported.insert(&entry.id) {
            violations.push(format!("candidate {} appears more than once", entry.id));
        }
    }

    violations
}

/// A final-order entry resolved against the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCandidate {
    pub position: usize,
    pub role: Role,
    pub role_label: &'static str,
    pub candidate: ScoredCandidate,
}

/// Resolve entries to scored candidates, silently dropping references that no longer exist.
pub fn hydrate(entries: &[FinalOrderEntry], scored: &[ScoredCandidate]) -> Vec<PlacedCandidate> {
    let by_id: HashMap<&CandidateId, &ScoredCandidate> =
        scored.iter().map(|candidate| (&candidate.id, candidate)).collect();

    entries
        .iter()
        .filter_map(|entry| by_id.get(&entry.id).map(|candidate| (entry.role, *candidate)))
        .enumerate()
        .map(|(index, (role, candidate))| PlacedCandidate {
            position: index + 1,
            role,
            role_label: role.label(),
            candidate: candidate.clone(),
        })
        .collect()
}

/// Keep only the entries that still resolve to a roster candidate.
pub fn drop_stale(entries: &[FinalOrderEntry], candidates: &[Candidate]) -> Vec<FinalOrderEntry> {
    let known: HashSet<&CandidateId> = candidates.iter().map(|candidate| &candidate.id).collect();
    entries
        .iter()
        .filter(|entry| known.contains(&entry.id))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Swap the entry at `index` with its neighbour. Returns false when the move falls off either end.
pub fn move_entry(entries: &mut [FinalOrderEntry], index: usize, direction: MoveDirection) -> bool {
    if index >= entries.len() {
        return false;
    }
    let target = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < entries.len() => index + 1,
        _ => return false,
    };
    entries.swap(index, target);
    true
}
