use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{PatientDetails, RawAnswers, Submission};
use super::localization::{LabelSet, Language};
use super::model::RiskModel;
use super::prediction::AssessmentOutcome;
use super::resources::{help_resources, HelpResource};
use super::service::{AssessmentError, AssessmentService};

pub const POPULATION_CAVEAT_HEADER: &str = "x-population-caveat";

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub patient: PatientDetails,
    pub answers: RawAnswers,
    #[serde(default)]
    pub language: Option<String>,
}

impl AssessmentRequest {
    fn into_parts(self) -> (Submission, Language) {
        let language = match self.language.as_deref() {
            Some(code) => Language::from_code(code).unwrap_or_else(|err| {
                tracing::debug!(%err, "falling back to English labels");
                Language::English
            }),
            None => Language::English,
        };

        let submission = Submission {
            patient: self.patient,
            answers: self.answers,
        };
        (submission, language)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    #[serde(flatten)]
    pub outcome: AssessmentOutcome,
    pub labels: LabelSet,
    pub resources: Vec<HelpResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceQuery {
    #[serde(default)]
    pub location: Option<String>,
}

/// Router builder exposing assessment, report, and static content endpoints.
pub fn assessment_router<M>(service: Arc<AssessmentService<M>>) -> Router
where
    M: RiskModel + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(assess_handler::<M>))
        .route("/api/v1/assessments/report", post(report_handler::<M>))
        .route("/api/v1/resources", get(resources_handler))
        .route("/api/v1/labels/:language", get(labels_handler))
        .with_state(service)
}

pub(crate) async fn assess_handler<M>(
    State(service): State<Arc<AssessmentService<M>>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    M: RiskModel + 'static,
{
    let (submission, language) = request.into_parts();

    match service.assess(&submission) {
        Ok(outcome) => {
            let body = AssessmentResponse {
                outcome,
                labels: LabelSet::for_language(language),
                resources: help_resources(submission.patient.location.as_deref()),
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<M>(
    State(service): State<Arc<AssessmentService<M>>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    M: RiskModel + 'static,
{
    let (submission, _) = request.into_parts();

    match service.assess_with_report(&submission, Local::now().naive_local()) {
        Ok((outcome, document)) => {
            let headers = [
                (header::CONTENT_TYPE, document.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.file_name),
                ),
                (
                    HeaderName::from_static(POPULATION_CAVEAT_HEADER),
                    outcome.has_caveat().to_string(),
                ),
            ];
            (StatusCode::OK, headers, document.bytes).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn resources_handler(Query(query): Query<ResourceQuery>) -> Response {
    let resources = help_resources(query.location.as_deref());
    (StatusCode::OK, axum::Json(json!({ "resources": resources }))).into_response()
}

pub(crate) async fn labels_handler(Path(language): Path<String>) -> Response {
    match Language::from_code(&language) {
        Ok(language) => (StatusCode::OK, axum::Json(LabelSet::for_language(language))).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: AssessmentError) -> Response {
    match err {
        AssessmentError::Encoding(error) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AssessmentError::Inference(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
