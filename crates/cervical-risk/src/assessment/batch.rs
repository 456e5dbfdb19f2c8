//! CSV batch intake: one submission per row, each assessed independently.

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::codec::EncodingError;
use super::domain::{normalize_key, FormField, RawAnswers, Submission};
use super::model::{ModelInferenceError, RiskModel};
use super::prediction::{AssessmentOutcome, RiskLabel};
use super::service::{AssessmentError, AssessmentService};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read batch file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid batch CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("batch header has more than one column for {field}")]
    DuplicateColumn { field: FormField },
    #[error("risk model failed on line {line}: {source}")]
    Inference {
        line: u64,
        source: ModelInferenceError,
    },
}

/// Result for a single CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchRowResult {
    Assessed(AssessmentOutcome),
    Rejected {
        field: FormField,
        reason: String,
        #[serde(skip)]
        error: EncodingError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    /// One-based line in the source file.
    pub line: u64,
    #[serde(flatten)]
    pub result: BatchRowResult,
}

impl BatchRow {
    pub fn outcome(&self) -> Option<&AssessmentOutcome> {
        match &self.result {
            BatchRowResult::Assessed(outcome) => Some(outcome),
            BatchRowResult::Rejected { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&EncodingError> {
        match &self.result {
            BatchRowResult::Rejected { error, .. } => Some(error),
            BatchRowResult::Assessed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub rows: Vec<BatchRow>,
    pub assessed: usize,
    pub at_risk: usize,
    pub rejected: usize,
}

impl BatchSummary {
    fn push(&mut self, row: BatchRow) {
        match &row.result {
            BatchRowResult::Assessed(outcome) => {
                self.assessed += 1;
                if outcome.label == RiskLabel::AtRisk {
                    self.at_risk += 1;
                }
            }
            BatchRowResult::Rejected { .. } => self.rejected += 1,
        }
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Location,
    Country,
    Answer,
}

impl Column {
    fn classify(header: &str) -> Self {
        match normalize_key(header).as_str() {
            "name" | "patientname" => Column::Name,
            "location" => Column::Location,
            "country" => Column::Country,
            _ => Column::Answer,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl<M> AssessmentService<M>
where
    M: RiskModel + 'static,
{
    pub fn assess_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<BatchSummary, BatchError> {
        let file = std::fs::File::open(path)?;
        self.assess_csv(file)
    }

    /// Assess every row of a CSV export. Rows that fail encoding are reported and
    /// skipped; a model failure aborts the whole batch.
    pub fn assess_csv<R: Read>(&self, reader: R) -> Result<BatchSummary, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns: Vec<Column> = headers.iter().map(Column::classify).collect();

        let mut answer_fields = Vec::new();
        for (header, column) in headers.iter().zip(&columns) {
            if *column != Column::Answer {
                continue;
            }
            if let Some(field) = FormField::from_key(header) {
                if answer_fields.contains(&field) {
                    return Err(BatchError::DuplicateColumn { field });
                }
                answer_fields.push(field);
            }
        }
        let mut summary = BatchSummary::default();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |position| position.line());

            let mut submission = Submission::default();
            let mut answers = RawAnswers::new();
            for ((header, column), value) in headers.iter().zip(&columns).zip(record.iter()) {
                match column {
                    Column::Name => submission.patient.name = non_blank(value),
                    Column::Location => submission.patient.location = non_blank(value),
                    Column::Country => submission.patient.country = non_blank(value),
                    Column::Answer => answers.insert(header, value),
                }
            }
            submission.answers = answers;

            let result = match self.assess(&submission) {
                Ok(outcome) => BatchRowResult::Assessed(outcome),
                Err(AssessmentError::Encoding(error)) => {
                    tracing::warn!(line, field = %error.field(), "batch row rejected");
                    BatchRowResult::Rejected {
                        field: error.field(),
                        reason: error.to_string(),
                        error,
                    }
                }
                Err(AssessmentError::Inference(source)) => {
                    return Err(BatchError::Inference { line, source })
                }
            };

            summary.push(BatchRow { line, result });
        }

        tracing::info!(
            assessed = summary.assessed,
            at_risk = summary.at_risk,
            rejected = summary.rejected,
            "batch assessment finished"
        );

        Ok(summary)
    }
}
