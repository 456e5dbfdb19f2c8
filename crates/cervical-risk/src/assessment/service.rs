use std::sync::Arc;

use chrono::NaiveDateTime;

use super::codec::EncodingError;
use super::domain::{FormAnswers, Submission};
use super::features::FeatureVector;
use super::model::{ModelInferenceError, RiskModel};
use super::prediction::{AssessmentOutcome, PopulationCaveat, RiskLabel};
use super::report::{RenderedDocument, Report, ReportFormatter};

/// Failure while assessing a single submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("risk model failed: {0}")]
    Inference(#[from] ModelInferenceError),
}

/// Service composing the codec, the risk model, and the report formatter.
pub struct AssessmentService<M> {
    model: Arc<M>,
    formatter: ReportFormatter,
}

impl<M> Clone for AssessmentService<M> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            formatter: self.formatter,
        }
    }
}

struct Scored {
    answers: FormAnswers,
    outcome: AssessmentOutcome,
}

impl<M> AssessmentService<M>
where
    M: RiskModel + 'static,
{
    pub fn new(model: Arc<M>) -> Self {
        Self::with_formatter(model, ReportFormatter::new())
    }

    pub fn with_formatter(model: Arc<M>, formatter: ReportFormatter) -> Self {
        Self { model, formatter }
    }

    /// Decode, encode and classify one submission.
    pub fn assess(&self, submission: &Submission) -> Result<AssessmentOutcome, AssessmentError> {
        self.score(submission).map(|scored| scored.outcome)
    }

    /// Assess and render the downloadable document. No document is produced on error.
    pub fn assess_with_report(
        &self,
        submission: &Submission,
        generated_at: NaiveDateTime,
    ) -> Result<(AssessmentOutcome, RenderedDocument), AssessmentError> {
        let Scored { answers, outcome } = self.score(submission)?;

        let report = Report::new(&submission.patient, &answers, outcome.label, generated_at);
        let document = self.formatter.render(&report);
        tracing::debug!(
            pages = document.page_count,
            bytes = document.bytes.len(),
            "assessment report rendered"
        );

        Ok((outcome, document))
    }

    fn score(&self, submission: &Submission) -> Result<Scored, AssessmentError> {
        let answers = FormAnswers::from_raw(&submission.answers).map_err(|err| {
            tracing::info!(field = %err.field(), "submission rejected by codec");
            err
        })?;
        let features = FeatureVector::from_answers(&answers);

        let class = self.model.predict(&features).map_err(|err| {
            tracing::error!(error = %err, "risk model inference failed");
            err
        })?;
        let label = RiskLabel::try_from(class)?;
        let caveat = PopulationCaveat::for_gender(answers.gender);

        tracing::info!(
            label = label.label(),
            caveat = caveat.is_some(),
            "assessment completed"
        );

        let outcome =
            AssessmentOutcome::new(label, submission.patient.display_name(), caveat, features);
        Ok(Scored { answers, outcome })
    }
}
