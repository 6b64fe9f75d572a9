//! Turns an operator-supplied CSV document into quiz entries.

use serde::Deserialize;
use thiserror::Error;

use crate::state::game::QaEntry;

/// Reasons a quiz document is refused. Only the first problem is reported.
#[derive(Debug, Error)]
pub enum QuizImportError {
    /// The document is not well-formed CSV.
    #[error("failed to parse quiz CSV: {0}")]
    Parse(#[from] csv::Error),
    /// No row carried any content.
    #[error("quiz CSV has no valid rows (check question_id, question, answer)")]
    NoValidRows,
}

/// One data row; unknown columns are ignored and missing ones read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QaRecord {
    question_id: Option<String>,
    question: Option<String>,
    answer: Option<String>,
}

impl QaRecord {
    fn into_entry(self) -> Option<QaEntry> {
        let entry = QaEntry {
            question_id: self.question_id.unwrap_or_default(),
            question: self.question.unwrap_or_default(),
            answer: self.answer.unwrap_or_default(),
        };
        let blank =
            entry.question_id.is_empty() && entry.question.is_empty() && entry.answer.is_empty();
        (!blank).then_some(entry)
    }
}

/// Parse a header-led CSV document with `question_id,question,answer` columns.
pub fn parse_quiz_csv(input: &str) -> Result<Vec<QaEntry>, QuizImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut entries = Vec::new();
    for record in reader.deserialize::<QaRecord>() {
        if let Some(entry) = record?.into_entry() {
            entries.push(entry);
        }
    }

    if entries.is_empty() {
        return Err(QuizImportError::NoValidRows);
    }
    Ok(entries)
}
