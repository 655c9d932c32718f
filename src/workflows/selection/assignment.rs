use serde::Serialize;
use tracing::{debug, info};

use super::domain::{Candidate, FinalOrderEntry, ProfileKey, Role, CANDIDATE_COUNT};
use super::ranking::rank;
use super::scoring::{evaluate_all, ScoredCandidate};

/// Raised when the planner is asked to run on anything but a full set of completed interviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlanError {
    #[error("incomplete dataset: {actual} completed interviews, exactly {required} required")]
    IncompleteDataset { required: usize, actual: usize },
}

/// Greedy role assignment over the completed candidates.
///
/// Roles are filled in [`Role::priority`] order. Each role takes the best
/// remaining candidate for its profile, so an earlier role always gets first
/// pick. The five candidates left over follow as `suplente`, ordered by the
/// overall score.
pub fn plan_assignment(candidates: &[Candidate]) -> Result<Vec<FinalOrderEntry>, PlanError> {
    let mut pool: Vec<ScoredCandidate> = evaluate_all(candidates)
        .into_iter()
        .filter(|candidate| candidate.status.is_done())
        .collect();

    if pool.len() != CANDIDATE_COUNT {
        return Err(PlanError::IncompleteDataset {
            required: CANDIDATE_COUNT,
            actual: pool.len(),
        });
    }

    let mut order = Vec::with_capacity(CANDIDATE_COUNT);

    for role in Role::priority() {
        let mut ranked = rank(&pool, role.profile_key());
        if ranked.is_empty() {
            break;
        }
        let best = ranked.remove(0);
        debug!(
            role = role.label(),
            candidate = %best.id,
            score = best.score(role.profile_key()),
            "role assigned"
        );
        order.push(FinalOrderEntry {
            id: best.id,
            role,
        });
        pool = ranked;
    }

    order.extend(
        rank(&pool, ProfileKey::Geral)
            .into_iter()
            .map(|candidate| FinalOrderEntry {
                id: candidate.id,
                role: Role::Suplente,
            }),
    );

    info!(entries = order.len(), "final order suggestion generated");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::selection::tests::common::{completed_panel, scores_from};

    #[test]
    fn refuses_to_plan_with_nine_completed_interviews() {
        let mut panel = completed_panel();
        panel[3].status = crate::workflows::selection::InterviewStatus::Pending;

        let err = plan_assignment(&panel).expect_err("nine done must fail");

        assert_eq!(
            err,
            PlanError::IncompleteDataset {
                required: 10,
                actual: 9
            }
        );
    }

    #[test]
    fn empty_start_state_reports_zero_completed() {
        let roster = crate::workflows::selection::default_roster();
        match plan_assignment(&roster) {
            Err(PlanError::IncompleteDataset { actual, .. }) => assert_eq!(actual, 0),
            other => panic!("expected incomplete dataset, got {other:?}"),
        }
    }

    #[test]
    fn assigns_roles_in_priority_order_and_covers_everyone() {
        let panel = completed_panel();

        let order = plan_assignment(&panel).expect("panel is complete");

        let roles: Vec<Role> = order.iter().map(|entry| entry.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::Portavoz,
                Role::Debatedor,
                Role::Tecnico,
                Role::Redator,
                Role::Organizacao,
                Role::Suplente,
                Role::Suplente,
                Role::Suplente,
                Role::Suplente,
                Role::Suplente,
            ]
        );
        let mut ids: Vec<_> = order.iter().map(|entry| entry.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn earlier_role_winner_is_unavailable_for_later_roles() {
        let mut panel = completed_panel();
        // Strongest at everything: wins portavoz and must not reappear.
        panel[0].scores = scores_from([4, 4, 4, 4, 4, 4, 4, 4, 4, 4]);

        let order = plan_assignment(&panel).expect("panel is complete");

        assert_eq!(order[0].id, panel[0].id);
        assert_eq!(order[0].role, Role::Portavoz);
        assert_eq!(
            order.iter().filter(|entry| entry.id == panel[0].id).count(),
            1
        );
    }
}
