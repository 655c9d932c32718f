//! Deterministic per-profile ranking.
//!
//! Two separate tolerances apply. [`SCORE_EPSILON`] only absorbs floating-point
//! noise. [`PRACTICAL_TIE_BAND`] marks role scores that are close enough to be
//! treated as equal, in which case the overall score decides first.
//!
//! The practical-tie comparator is not transitive, so it cannot be handed to
//! `slice::sort_by`. Candidates are first put in a canonical order (key score,
//! name, id), and then a stable insertion pass applies the comparator. Every
//! adjacent pair in the output satisfies the comparator. Ranking an already
//! ranked list leaves it unchanged.

use std::cmp::Ordering;

use super::domain::ProfileKey;
use super::scoring::ScoredCandidate;

/// Tolerance for floating-point noise when comparing scores.
pub const SCORE_EPSILON: f64 = 1e-6;

/// Role-score differences below this are treated as a practical tie.
pub const PRACTICAL_TIE_BAND: f64 = 0.2;

/// Rank candidates by `key`, best first.
pub fn rank(candidates: &[ScoredCandidate], key: ProfileKey) -> Vec<ScoredCandidate> {
    let mut ranked = candidates.to_vec();
    if ranked.len() < 2 {
        return ranked;
    }

    ranked.sort_by(|a, b| {
        b.score(key)
            .total_cmp(&a.score(key))
            .then_with(|| compare_names(&a.name, &b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    for index in 1..ranked.len() {
        let mut position = index;
        while position > 0
            && compare(&ranked[position - 1], &ranked[position], key) == Ordering::Greater
        {
            ranked.swap(position - 1, position);
            position -= 1;
        }
    }

    ranked
}

/// Ordering of two candidates for `key`. `Less` means `a` ranks ahead of `b`.
pub fn compare(a: &ScoredCandidate, b: &ScoredCandidate, key: ProfileKey) -> Ordering {
    let by_geral = || descending(a.profiles.geral, b.profiles.geral);

    if key == ProfileKey::Geral {
        return by_geral().then_with(|| by_name(a, b));
    }

    let score_a = a.score(key);
    let score_b = b.score(key);

    if (score_a - score_b).abs() < PRACTICAL_TIE_BAND {
        by_geral()
            .then_with(|| descending(score_a, score_b))
            .then_with(|| by_name(a, b))
    } else {
        score_b.total_cmp(&score_a)
    }
}

/// Whether two scores fall inside the practical-tie band.
pub fn is_practical_tie(a: f64, b: f64) -> bool {
    (a - b).abs() < PRACTICAL_TIE_BAND
}

fn descending(a: f64, b: f64) -> Ordering {
    if (a - b).abs() > SCORE_EPSILON {
        b.total_cmp(&a)
    } else {
        Ordering::Equal
    }
}

fn by_name(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    compare_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
}

/// Alphabetical name order in collation levels: base letters, then accents,
/// then case with lowercase first, then exact text.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let base = |name: &str| name.chars().flat_map(fold_char).collect::<Vec<_>>();
    let accented = |name: &str| name.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let uppercase = |name: &str| name.chars().map(char::is_uppercase).collect::<Vec<_>>();

    base(a)
        .cmp(&base(b))
        .then_with(|| accented(a).cmp(&accented(b)))
        .then_with(|| uppercase(a).cmp(&uppercase(b)))
        .then_with(|| a.cmp(b))
}

fn fold_char(c: char) -> std::char::ToLowercase {
    let base = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    };
    base.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::selection::domain::{CandidateId, InterviewStatus};
    use crate::workflows::selection::scoring::{ProfileScores, SubScores};

    fn candidate(
        id: &str,
        name: &str,
        key: ProfileKey,
        key_score: f64,
        geral: f64,
    ) -> ScoredCandidate {
        let mut profiles = ProfileScores {
            geral,
            ..ProfileScores::default()
        };
        match key {
            ProfileKey::Portavoz => profiles.portavoz = key_score,
            ProfileKey::Debatedor => profiles.debatedor = key_score,
            ProfileKey::Tecnico => profiles.tecnico = key_score,
            ProfileKey::Redator => profiles.redator = key_score,
            ProfileKey::Organizacao => profiles.organizacao = key_score,
            ProfileKey::Geral => profiles.geral = key_score,
        }
        ScoredCandidate {
            id: CandidateId(id.to_string()),
            name: name.to_string(),
            status: InterviewStatus::Done,
            sub_scores: SubScores::default(),
            profiles,
        }
    }

    fn names(ranked: &[ScoredCandidate]) -> Vec<&str> {
        ranked.iter().map(|candidate| candidate.name.as_str()).collect()
    }

    #[test]
    fn practical_tie_with_equal_geral_falls_back_to_key_score() {
        let bruno = candidate("c-1", "Bruno", ProfileKey::Portavoz, 2.9, 3.5);
        let ana = candidate("c-0", "Ana", ProfileKey::Portavoz, 3.0, 3.5);

        let ranked = rank(&[bruno, ana], ProfileKey::Portavoz);

        assert_eq!(names(&ranked), vec!["Ana", "Bruno"]);
    }

    #[test]
    fn practical_tie_prefers_stronger_geral() {
        let ana = candidate("c-0", "Ana", ProfileKey::Redator, 3.1, 2.0);
        let bruno = candidate("c-1", "Bruno", ProfileKey::Redator, 3.0, 2.8);

        let ranked = rank(&[ana, bruno], ProfileKey::Redator);

        assert_eq!(names(&ranked), vec!["Bruno", "Ana"]);
    }

    #[test]
    fn clear_gap_ranks_by_key_score_regardless_of_geral() {
        let ana = candidate("c-0", "Ana", ProfileKey::Tecnico, 2.5, 3.9);
        let bruno = candidate("c-1", "Bruno", ProfileKey::Tecnico, 3.0, 1.0);

        let ranked = rank(&[ana, bruno], ProfileKey::Tecnico);

        assert_eq!(names(&ranked), vec!["Bruno", "Ana"]);
    }

    #[test]
    fn exact_tie_orders_by_name() {
        let bruno = candidate("c-0", "Bruno", ProfileKey::Debatedor, 2.0, 2.0);
        let ana = candidate("c-1", "Ana", ProfileKey::Debatedor, 2.0, 2.0);

        let ranked = rank(&[bruno, ana], ProfileKey::Debatedor);

        assert_eq!(names(&ranked), vec!["Ana", "Bruno"]);
    }

    #[test]
    fn geral_key_ignores_noise_below_epsilon() {
        let bruno = candidate("c-0", "Bruno", ProfileKey::Geral, 3.0 + 1e-9, 3.0 + 1e-9);
        let ana = candidate("c-1", "Ana", ProfileKey::Geral, 3.0, 3.0);
        let carla = candidate("c-2", "Carla", ProfileKey::Geral, 3.5, 3.5);

        let ranked = rank(&[bruno, ana, carla], ProfileKey::Geral);

        assert_eq!(names(&ranked), vec!["Carla", "Ana", "Bruno"]);
    }

    #[test]
    fn single_candidate_is_returned_unchanged() {
        let ana = candidate("c-0", "Ana", ProfileKey::Geral, 1.0, 1.0);
        let ranked = rank(std::slice::from_ref(&ana), ProfileKey::Portavoz);
        assert_eq!(ranked, vec![ana]);
        assert!(rank(&[], ProfileKey::Geral).is_empty());
    }

    #[test]
    fn ranking_is_independent_of_input_order_and_idempotent() {
        let pool = vec![
            candidate("c-0", "Ana", ProfileKey::Portavoz, 3.00, 2.0),
            candidate("c-1", "Bruno", ProfileKey::Portavoz, 3.15, 3.0),
            candidate("c-2", "Carla", ProfileKey::Portavoz, 3.30, 1.0),
            candidate("c-3", "Duarte", ProfileKey::Portavoz, 1.00, 4.0),
            candidate("c-4", "Eva", ProfileKey::Portavoz, 3.30, 1.0),
        ];
        let mut reversed = pool.clone();
        reversed.reverse();

        let ranked = rank(&pool, ProfileKey::Portavoz);
        assert_eq!(ranked, rank(&reversed, ProfileKey::Portavoz));
        assert_eq!(rank(&ranked, ProfileKey::Portavoz), ranked);

        for pair in ranked.windows(2) {
            assert_ne!(
                compare(&pair[0], &pair[1], ProfileKey::Portavoz),
                Ordering::Greater,
                "{} should not rank ahead of {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn names_compare_case_and_accent_insensitively_first() {
        assert_eq!(compare_names("ana", "Bruno"), Ordering::Less);
        assert_eq!(compare_names("Álvaro", "Bruno"), Ordering::Less);
        assert_eq!(compare_names("Ana", "Ana"), Ordering::Equal);
        assert_eq!(compare_names("ana", "Ana"), Ordering::Less);
        assert_eq!(compare_names("Ana", "ana"), Ordering::Greater);
    }

    #[test]
    fn names_sort_accents_then_lowercase_first() {
        let mut names = vec!["Ana", "Álvaro", "ana", "alvaro"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["alvaro", "Álvaro", "ana", "Ana"]);
    }

    #[test]
    fn practical_tie_band_is_exclusive() {
        assert!(is_practical_tie(3.0, 2.85));
        assert!(!is_practical_tie(3.0, 2.5));
    }
}
