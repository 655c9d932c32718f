use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{Candidate, InterviewStatus, RawScores, CANDIDATE_COUNT, MAX_SCORE};

#[derive(Debug, thiserror::Error)]
pub enum ScoreSheetError {
    #[error("failed to read score sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid score sheet data: {0}")]
    Csv(#[from] csv::Error),
    #[error("score sheet must list exactly {expected} candidates, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row}: question {question} scored {score}, rubric allows 0-4")]
    ScoreOutOfRange { row: usize, question: u8, score: u8 },
    #[error("row {row}: interview marked done with {answered} of 10 questions scored")]
    IncompleteInterview { row: usize, answered: usize },
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    name: String,
    #[serde(default)]
    status: Option<InterviewStatus>,
    q1: Option<u8>,
    q2: Option<u8>,
    q3: Option<u8>,
    q4: Option<u8>,
    q5: Option<u8>,
    q6: Option<u8>,
    q7: Option<u8>,
    q8: Option<u8>,
    q9: Option<u8>,
    q10: Option<u8>,
    #[serde(default)]
    notes: Option<String>,
}

impl SheetRow {
    fn answers(&self) -> [Option<u8>; 10] {
        [
            self.q1, self.q2, self.q3, self.q4, self.q5, self.q6, self.q7, self.q8, self.q9,
            self.q10,
        ]
    }
}

/// One parsed interview line from a score sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetEntry {
    pub name: String,
    pub scores: RawScores,
    pub notes: String,
    pub status: InterviewStatus,
}

/// Interview results captured outside the service, one row per candidate slot.
///
/// Expected header: `name,status,q1,...,q10,notes`. Blank question cells are
/// unanswered. A blank status means `done` when all ten questions are scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSheet {
    entries: Vec<SheetEntry>,
}

impl ScoreSheet {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoreSheetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoreSheetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (index, row) in csv_reader.deserialize::<SheetRow>().enumerate() {
            entries.push(parse_row(index + 1, row?)?);
        }

        if entries.len() != CANDIDATE_COUNT {
            return Err(ScoreSheetError::RowCount {
                expected: CANDIDATE_COUNT,
                found: entries.len(),
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SheetEntry] {
        &self.entries
    }

    /// Copy the sheet onto the roster slot by slot. Candidate ids are kept.
    pub fn apply(&self, candidates: &mut [Candidate]) {
        for (candidate, entry) in candidates.iter_mut().zip(&self.entries) {
            candidate.name = entry.name.clone();
            candidate.scores = entry.scores.clone();
            candidate.notes = entry.notes.clone();
            candidate.status = entry.status;
        }
    }
}

fn parse_row(row: usize, record: SheetRow) -> Result<SheetEntry, ScoreSheetError> {
    let mut scores = RawScores::new();
    for (question, answer) in (1u8..).zip(record.answers()) {
        if let Some(score) = answer {
            if score > MAX_SCORE {
                return Err(ScoreSheetError::ScoreOutOfRange {
                    row,
                    question,
                    score,
                });
            }
            scores.set(question, score);
        }
    }

    let status = match record.status {
        Some(InterviewStatus::Done) if !scores.is_complete() => {
            return Err(ScoreSheetError::IncompleteInterview {
                row,
                answered: scores.answered(),
            })
        }
        Some(status) => status,
        None if scores.is_complete() => InterviewStatus::Done,
        None => InterviewStatus::Pending,
    };

    Ok(SheetEntry {
        name: record.name,
        scores,
        notes: record.notes.unwrap_or_default(),
        status,
    })
}
