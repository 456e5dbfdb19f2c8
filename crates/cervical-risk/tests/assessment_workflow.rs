//! End-to-end assessment scenarios against the shipped model artifact, exercised through
//! the public service facade and HTTP router.

mod common {
    use std::path::PathBuf;
    use std::sync::Arc;

    use cervical_risk::assessment::{
        AssessmentService, LinearRiskModel, PatientDetails, RawAnswers, Submission,
    };

    pub(super) fn artifact_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/cervicalcancer.json")
    }

    pub(super) fn service() -> AssessmentService<LinearRiskModel> {
        let model = LinearRiskModel::from_path(artifact_path()).expect("shipped model loads");
        AssessmentService::new(Arc::new(model))
    }

    pub(super) fn answers() -> RawAnswers {
        RawAnswers::new()
            .with("Age", 30_i64)
            .with("Gender", "Female")
            .with("Place Of Residence", "Urban")
            .with("Educational Status", "Literate")
            .with("Socio Economic Status", "Middle")
            .with("Parity", "None")
            .with("Age At First Pregnancy", "<=20")
            .with("Menstrual Cycle", "Regular")
            .with("Menstrual Hygiene", "Napkin")
            .with("Contraception", "Oral Pills")
            .with("Smoking", "Passive")
            .with("HighRiskHPV", "Negative")
            .with("IL6", "GG")
            .with("IL1beta", "TT")
            .with("TNFalpha", "GG")
            .with("IL1RN", "I I")
    }

    pub(super) fn submission(answers: RawAnswers) -> Submission {
        Submission {
            patient: PatientDetails {
                name: Some("Meera".to_string()),
                location: Some("Mumbai".to_string()),
                country: Some("India".to_string()),
            },
            answers,
        }
    }
}

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use cervical_risk::assessment::{
    assessment_router, encode, AssessmentError, EncodingError, FormField, LinearRiskModel,
    ModelLoadError, RiskLabel, RiskModel,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

#[test]
fn shipped_model_scores_documented_example() {
    let model = LinearRiskModel::from_path(common::artifact_path()).expect("model loads");
    let features = encode(&common::answers()).expect("answers encode");

    assert_eq!(
        features.values(),
        &[30.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 1.0, 1.0]
    );
    assert_eq!(model.predict(&features), Ok(0));
    assert!(model.probability(&features).expect("finite") < 0.5);
}

#[test]
fn positive_hpv_flips_the_shipped_model() {
    let service = common::service();
    let answers = common::answers().with("HighRiskHPV", "Positive");

    let outcome = service
        .assess(&common::submission(answers))
        .expect("assessment succeeds");

    assert_eq!(outcome.label, RiskLabel::AtRisk);
    assert_eq!(outcome.message, "Meera, you may have a risk of Cervical Cancer.");
}

#[test]
fn report_is_generated_for_valid_submission_only() {
    let service = common::service();
    let generated_at = NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid timestamp");

    let (outcome, document) = service
        .assess_with_report(&common::submission(common::answers()), generated_at)
        .expect("report renders");
    assert_eq!(outcome.label, RiskLabel::NoRisk);
    assert_eq!(document.file_name, "cervical_cancer_report.pdf");
    let text = String::from_utf8_lossy(&document.bytes);
    assert!(text.contains("(Date: 2025-06-01 12:00:00) Tj"));
    assert!(text.contains("(Contraception: OralPills) Tj"));
    assert!(text.trim_end().ends_with("%%EOF"));

    let answers = common::answers().with("Age", 0_i64);
    let err = service
        .assess_with_report(&common::submission(answers), generated_at)
        .expect_err("age out of range");
    assert_eq!(
        err,
        AssessmentError::Encoding(EncodingError::AgeOutOfRange { value: 0 })
    );
}

#[test]
fn artifact_with_wrong_layout_is_rejected() {
    let artifact = json!({
        "feature_names": ["Age", "Gender"],
        "coefficients": [0.1, 0.2],
        "intercept": 0.0
    });

    let err = LinearRiskModel::from_reader(Cursor::new(artifact.to_string()))
        .expect_err("layout mismatch");
    assert!(matches!(err, ModelLoadError::FeatureLayout { .. }));
}

#[test]
fn batch_csv_reports_rejected_lines() {
    let service = common::service();
    let csv = "\
Name,Age,Gender,PlaceOfResidence,EducationalStatus,SocioEconomicStatus,Parity,AgeAtFirstPregnancy,MenstrualCycle,MenstrualHygiene,Contraception,Smoking,HighRiskHPV,IL6,IL1beta,TNFalpha,IL1RN
Meera,30,Female,Urban,Literate,Middle,None,<=20,Regular,Napkin,OralPills,Passive,Negative,GG,TT,GG,I I
Leela,41,Female,Rural,Illiterate,Lower,more_than_2,<=20,Irregular,Cloths,Others,Active,Positive,AG,CC,GA,II IV
Nisha,29,Female,Urban,Literate,Upper,None,more_than_20,Regular,Napkin,OralPills,Passive,,GG,TT,GG,I I
";

    let summary = service.assess_csv(Cursor::new(csv)).expect("batch runs");

    assert_eq!(summary.assessed, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.rows[0].outcome().map(|o| o.label), Some(RiskLabel::NoRisk));
    assert_eq!(summary.rows[1].outcome().map(|o| o.label), Some(RiskLabel::AtRisk));
    assert_eq!(summary.rows[2].line, 4);
    assert_eq!(
        summary.rows[2].error(),
        Some(&EncodingError::MissingField {
            field: FormField::HighRiskHpv
        })
    );
}

#[tokio::test]
async fn http_flow_returns_outcome_and_pdf() {
    let router = assessment_router(Arc::new(common::service()));
    let body = json!({
        "patient": { "name": "Meera", "location": "Navi Mumbai" },
        "answers": common::answers(),
        "language": "hi"
    });

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/assessments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&bytes).expect("json payload");
    assert_eq!(payload["label"], "no_risk");
    assert_eq!(payload["labels"]["labels"][1]["text"], "नाम");
    assert_eq!(
        payload["resources"][5]["url"],
        "https://www.google.com/maps/search/gynecologist+in+Navi+Mumbai"
    );

    let response = router
        .oneshot(
            Request::post("/api/v1/assessments/report")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-population-caveat"], "false");
}
