use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::assessment::domain::{FormAnswers, PatientDetails, RawAnswers, Submission};
use crate::assessment::features::FeatureVector;
use crate::assessment::model::{ModelInferenceError, RiskModel};
use crate::assessment::service::AssessmentService;

/// Answers whose encoding is `[30,2,2,2,1,1,1,1,1,2,1,3,1,1,1]`.
pub(crate) fn example_raw() -> RawAnswers {
    RawAnswers::new()
        .with("Age", 30_i64)
        .with("Gender", "Female")
        .with("PlaceOfResidence", "Urban")
        .with("EducationalStatus", "Literate")
        .with("SocioEconomicStatus", "Middle")
        .with("Parity", "None")
        .with("AgeAtFirstPregnancy", "≤20")
        .with("MenstrualCycle", "Regular")
        .with("MenstrualHygiene", "Napkin")
        .with("Contraception", "OralPills")
        .with("Smoking", "Passive")
        .with("HighRiskHPV", "Negative")
        .with("IL6", "GG")
        .with("IL1beta", "TT")
        .with("TNFalpha", "GG")
        .with("IL1RN", "I I")
}

pub(crate) const EXAMPLE_VECTOR: [f64; 15] = [
    30.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 1.0, 1.0,
];

pub(crate) fn example_answers() -> FormAnswers {
    FormAnswers::from_raw(&example_raw()).expect("example answers decode")
}

pub(crate) fn example_vector() -> FeatureVector {
    FeatureVector::from_answers(&example_answers())
}

pub(crate) fn submission(name: Option<&str>) -> Submission {
    Submission {
        patient: PatientDetails {
            name: name.map(str::to_string),
            location: Some("New Delhi".to_string()),
            country: Some("India".to_string()),
        },
        answers: example_raw(),
    }
}

pub(crate) fn male_submission() -> Submission {
    let mut submission = submission(Some("Ravi"));
    submission.answers.insert("Gender", "Male");
    submission
}

pub(crate) fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

/// Classifier that always answers with a fixed class and counts its calls.
#[derive(Debug, Default)]
pub(crate) struct FixedModel {
    pub(crate) class: u8,
    pub(crate) calls: AtomicUsize,
}

impl FixedModel {
    pub(crate) fn returning(class: u8) -> Self {
        Self {
            class,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RiskModel for FixedModel {
    fn predict(&self, _features: &FeatureVector) -> Result<u8, ModelInferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.class)
    }
}

/// Classifier that always fails.
#[derive(Debug, Default)]
pub(crate) struct UnavailableModel;

impl RiskModel for UnavailableModel {
    fn predict(&self, _features: &FeatureVector) -> Result<u8, ModelInferenceError> {
        Err(ModelInferenceError::Unavailable("model offline".to_string()))
    }
}

pub(crate) fn service_returning(class: u8) -> (AssessmentService<FixedModel>, Arc<FixedModel>) {
    let model = Arc::new(FixedModel::returning(class));
    (AssessmentService::new(model.clone()), model)
}

pub(crate) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
