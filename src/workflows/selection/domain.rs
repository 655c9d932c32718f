use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of candidates in every selection panel.
pub const CANDIDATE_COUNT: usize = 10;

/// Highest rubric score a question can receive.
pub const MAX_SCORE: u8 = 4;

/// Stable candidate identifier, assigned once and never reused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn for_slot(index: usize) -> Self {
        Self(format!("c-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionCategory {
    Principal,
    Debate,
    Support,
}

impl QuestionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Principal => "Principal",
            Self::Debate => "Debate",
            Self::Support => "Support",
        }
    }
}

/// One fixed interview prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u8,
    pub category: QuestionCategory,
    pub time_limit_secs: u16,
    pub prompt: &'static str,
}

pub const QUESTIONS: [Question; 10] = [
    Question {
        id: 1,
        category: QuestionCategory::Principal,
        time_limit_secs: 45,
        prompt: "Conta uma situação em que um aluno gastou dinheiro e depois arrependeu-se. O que faltou na decisão?",
    },
    Question {
        id: 2,
        category: QuestionCategory::Principal,
        time_limit_secs: 45,
        prompt: "Explica a um colega em 20 segundos: 'pagar a prestações' é bom ou mau? Depende de quê?",
    },
    Question {
        id: 3,
        category: QuestionCategory::Principal,
        time_limit_secs: 45,
        prompt: "Diz 1 mensagem curta que convença alunos a aparecer (sem parecer 'palestra').",
    },
    Question {
        id: 4,
        category: QuestionCategory::Debate,
        time_limit_secs: 30,
        prompt: "Ataque: 'Literacia financeira é seca e inútil.' Resposta: 1 exemplo + 1 consequência.",
    },
    Question {
        id: 5,
        category: QuestionCategory::Debate,
        time_limit_secs: 30,
        prompt: "Ataque: 'Isso não muda nada, a malta continua a gastar.' Resposta: 1 mudança concreta de comportamento.",
    },
    Question {
        id: 6,
        category: QuestionCategory::Debate,
        time_limit_secs: 30,
        prompt: "Ataque: 'Basta dizer poupa.' Resposta: por que isso falha + o que falta (crédito/custo total/scams).",
    },
    Question {
        id: 7,
        category: QuestionCategory::Debate,
        time_limit_secs: 30,
        prompt: "Ataque: 'Se falas de scams/crypto, estás a assustar.' Resposta: diferença entre informar e assustar.",
    },
    Question {
        id: 8,
        category: QuestionCategory::Support,
        time_limit_secs: 60,
        prompt: "Cria uma atividade de 10 minutos (estilo desafio) que ensine 1 ideia útil de literacia financeira e que faça colegas quererem participar/votar em nós.",
    },
    Question {
        id: 9,
        category: QuestionCategory::Support,
        time_limit_secs: 60,
        prompt: "Como medes se resultou? Diz 2 indicadores simples (ex.: antes/depois num quiz curto).",
    },
    Question {
        id: 10,
        category: QuestionCategory::Support,
        time_limit_secs: 120,
        prompt: "Escreve: como vais ajudar a lista a receber votos?",
    },
];

pub fn question(id: u8) -> Option<&'static Question> {
    QUESTIONS.iter().find(|question| question.id == id)
}

/// Human label for a rubric score.
pub const fn rubric_label(score: u8) -> Option<&'static str> {
    match score {
        0 => Some("Não responde / Erra / Sem estrutura"),
        1 => Some("Fraco (vago, confuso)"),
        2 => Some("Aceitável (ideia certa, pouco clara)"),
        3 => Some("Bom (claro, correto, com exemplo)"),
        4 => Some("Excelente (curto, convincente, aplicável)"),
        _ => None,
    }
}

/// Partial map of question id to rubric score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawScores(BTreeMap<u8, u8>);

impl RawScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for a question, treating unanswered questions as 0.
    pub fn get(&self, question_id: u8) -> u8 {
        self.0.get(&question_id).copied().unwrap_or(0)
    }

    pub fn answer(&self, question_id: u8) -> Option<u8> {
        self.0.get(&question_id).copied()
    }

    pub fn set(&mut self, question_id: u8, score: u8) {
        self.0.insert(question_id, score);
    }

    pub fn answered(&self) -> usize {
        QUESTIONS
            .iter()
            .filter(|question| self.0.contains_key(&question.id))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == QUESTIONS.len()
    }

    /// Drops entries whose key is not a catalog question.
    pub(crate) fn retain_known(&mut self) {
        self.0.retain(|id, _| question(*id).is_some());
    }
}

impl FromIterator<(u8, u8)> for RawScores {
    fn from_iter<I: IntoIterator<Item = (u8, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    #[default]
    Pending,
    Done,
}

impl InterviewStatus {
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub scores: RawScores,
    pub notes: String,
    pub status: InterviewStatus,
}

impl Candidate {
    pub fn placeholder(index: usize) -> Self {
        Self {
            id: CandidateId::for_slot(index),
            name: format!("Candidato {}", index + 1),
            scores: RawScores::new(),
            notes: String::new(),
            status: InterviewStatus::Pending,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

/// Ten placeholder candidates with empty scores.
pub fn default_roster() -> Vec<Candidate> {
    (0..CANDIDATE_COUNT).map(Candidate::placeholder).collect()
}

/// Composite score a ranking can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKey {
    Portavoz,
    Debatedor,
    Tecnico,
    Redator,
    Organizacao,
    Geral,
}

impl ProfileKey {
    pub const fn roles() -> [Self; 5] {
        [
            Self::Portavoz,
            Self::Debatedor,
            Self::Tecnico,
            Self::Redator,
            Self::Organizacao,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Portavoz => "Porta-voz",
            Self::Debatedor => "Debatedor",
            Self::Tecnico => "Técnico",
            Self::Redator => "Redator",
            Self::Organizacao => "Organização",
            Self::Geral => "Geral",
        }
    }
}

/// Role label carried by a final-order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Portavoz,
    Debatedor,
    Tecnico,
    Redator,
    Organizacao,
    Suplente,
}

impl Role {
    /// Roles filled by the planner, in priority order.
    pub const fn priority() -> [Self; 5] {
        [
            Self::Portavoz,
            Self::Debatedor,
            Self::Tecnico,
            Self::Redator,
            Self::Organizacao,
        ]
    }

    pub const fn profile_key(self) -> ProfileKey {
        match self {
            Self::Portavoz => ProfileKey::Portavoz,
            Self::Debatedor => ProfileKey::Debatedor,
            Self::Tecnico => ProfileKey::Tecnico,
            Self::Redator => ProfileKey::Redator,
            Self::Organizacao => ProfileKey::Organizacao,
            Self::Suplente => ProfileKey::Geral,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Suplente => "Suplente",
            other => other.profile_key().label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinalOrderEntry {
    pub id: CandidateId,
    #[serde(rename = "roleAssigned")]
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStrategy {
    #[default]
    #[serde(rename = "PRIORITIZE_PROFILES")]
    PrioritizeProfiles,
}

impl SelectionStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PrioritizeProfiles => "Opção A: Priorizar Perfis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub name: String,
    pub school: String,
    pub strategy: SelectionStrategy,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: "PJ 25/26 Literacia Financeira".to_string(),
            school: String::new(),
            strategy: SelectionStrategy::PrioritizeProfiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_ten_questions_in_category_blocks() {
        let ids: Vec<u8> = QUESTIONS.iter().map(|question| question.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<u8>>());
        assert_eq!(question(3).map(|q| q.category), Some(QuestionCategory::Principal));
        assert_eq!(question(7).map(|q| q.category), Some(QuestionCategory::Debate));
        assert_eq!(question(10).map(|q| q.time_limit_secs), Some(120));
        assert!(question(11).is_none());
    }

    #[test]
    fn raw_scores_default_missing_answers_to_zero() {
        let mut scores = RawScores::new();
        scores.set(2, 3);
        assert_eq!(scores.get(2), 3);
        assert_eq!(scores.get(5), 0);
        assert_eq!(scores.answer(5), None);
        assert_eq!(scores.answered(), 1);
        assert!(!scores.is_complete());
    }

    #[test]
    fn raw_scores_serialize_with_string_question_keys() {
        let scores: RawScores = [(1, 4), (10, 2)].into_iter().collect();
        let json = serde_json::to_string(&scores).expect("scores serialize");
        assert_eq!(json, r#"{"1":4,"10":2}"#);
        let back: RawScores = serde_json::from_str(&json).expect("scores deserialize");
        assert_eq!(back, scores);
    }

    #[test]
    fn final_order_entry_uses_stored_field_names() {
        let entry = FinalOrderEntry {
            id: CandidateId::for_slot(4),
            role: Role::Suplente,
        };
        let json = serde_json::to_value(&entry).expect("entry serializes");
        assert_eq!(json["id"], "c-4");
        assert_eq!(json["roleAssigned"], "suplente");
    }

    #[test]
    fn default_roster_holds_ten_pending_placeholders() {
        let roster = default_roster();
        assert_eq!(roster.len(), CANDIDATE_COUNT);
        assert_eq!(roster[0].name, "Candidato 1");
        assert_eq!(roster[9].id, CandidateId("c-9".to_string()));
        assert!(roster.iter().all(|candidate| !candidate.is_done()));
    }
}
