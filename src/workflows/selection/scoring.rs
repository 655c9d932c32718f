use serde::{Deserialize, Serialize};

use super::domain::{
    Candidate, CandidateId, InterviewStatus, ProfileKey, QuestionCategory, RawScores, QUESTIONS,
};

/// Category averages derived from the raw rubric scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub principal: f64,
    pub debate: f64,
    pub support: f64,
}

/// Weighted role-fitness composites plus the overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileScores {
    pub portavoz: f64,
    pub debatedor: f64,
    pub tecnico: f64,
    pub redator: f64,
    pub organizacao: f64,
    pub geral: f64,
}

impl ProfileScores {
    pub fn get(&self, key: ProfileKey) -> f64 {
        match key {
            ProfileKey::Portavoz => self.portavoz,
            ProfileKey::Debatedor => self.debatedor,
            ProfileKey::Tecnico => self.tecnico,
            ProfileKey::Redator => self.redator,
            ProfileKey::Organizacao => self.organizacao,
            ProfileKey::Geral => self.geral,
        }
    }
}

/// Weights applied to (principal, debate, support) for one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileWeights {
    pub principal: f64,
    pub debate: f64,
    pub support: f64,
}

impl ProfileWeights {
    pub const fn for_key(key: ProfileKey) -> Self {
        match key {
            ProfileKey::Portavoz => Self::new(0.60, 0.30, 0.10),
            ProfileKey::Debatedor => Self::new(0.30, 0.60, 0.10),
            ProfileKey::Tecnico => Self::new(0.20, 0.40, 0.40),
            ProfileKey::Redator => Self::new(0.25, 0.15, 0.60),
            ProfileKey::Organizacao => Self::new(0.30, 0.15, 0.55),
            ProfileKey::Geral => Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
        }
    }

    const fn new(principal: f64, debate: f64, support: f64) -> Self {
        Self {
            principal,
            debate,
            support,
        }
    }

    pub fn total(&self) -> f64 {
        self.principal + self.debate + self.support
    }

    fn apply(&self, sub: &SubScores) -> f64 {
        sub.principal * self.principal + sub.debate * self.debate + sub.support * self.support
    }
}

/// Reduce a raw score map into the three category means. Unanswered questions count as 0.
pub fn aggregate(scores: &RawScores) -> SubScores {
    SubScores {
        principal: category_mean(scores, QuestionCategory::Principal),
        debate: category_mean(scores, QuestionCategory::Debate),
        support: category_mean(scores, QuestionCategory::Support),
    }
}

fn category_mean(scores: &RawScores, category: QuestionCategory) -> f64 {
    let (sum, count) = QUESTIONS
        .iter()
        .filter(|question| question.category == category)
        .fold((0u32, 0u32), |(sum, count), question| {
            (sum + u32::from(scores.get(question.id)), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    }
}

pub fn profile(sub: &SubScores) -> ProfileScores {
    let weighted = |key: ProfileKey| ProfileWeights::for_key(key).apply(sub);

    ProfileScores {
        portavoz: weighted(ProfileKey::Portavoz),
        debatedor: weighted(ProfileKey::Debatedor),
        tecnico: weighted(ProfileKey::Tecnico),
        redator: weighted(ProfileKey::Redator),
        organizacao: weighted(ProfileKey::Organizacao),
        geral: (sub.principal + sub.debate + sub.support) / 3.0,
    }
}

/// Candidate snapshot with freshly derived scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub id: CandidateId,
    pub name: String,
    pub status: InterviewStatus,
    pub sub_scores: SubScores,
    pub profiles: ProfileScores,
}

impl ScoredCandidate {
    pub fn evaluate(candidate: &Candidate) -> Self {
        let sub_scores = aggregate(&candidate.scores);
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            status: candidate.status,
            sub_scores,
            profiles: profile(&sub_scores),
        }
    }

    pub fn score(&self, key: ProfileKey) -> f64 {
        self.profiles.get(key)
    }
}

/// Score every candidate from its current raw scores.
pub fn evaluate_all(candidates: &[Candidate]) -> Vec<ScoredCandidate> {
    candidates.iter().map(ScoredCandidate::evaluate).collect()
}
