//! Cervical cancer risk assessment: form codec, model port, report, and HTTP surface.

pub mod batch;
pub mod codec;
pub mod domain;
pub mod features;
pub mod localization;
pub mod model;
pub mod prediction;
pub mod report;
pub mod resources;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{BatchError, BatchRow, BatchRowResult, BatchSummary};
pub use codec::{decode, Category, EncodingError};
pub use domain::{
    Age, AgeAtFirstPregnancy, Contraception, EducationalStatus, FormAnswers, FormField, Gender,
    HighRiskHpv, Il1BetaGenotype, Il1RnGenotype, Il6Genotype, MenstrualCycle, MenstrualHygiene,
    Parity, PatientDetails, PlaceOfResidence, RawAnswers, RawValue, Smoking, SocioEconomicStatus,
    Submission, TnfAlphaGenotype,
};
pub use features::{encode, feature_names, FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
pub use localization::{translate, LabelSet, Language, UnknownLanguage};
pub use model::{
    LinearRiskModel, ModelArtifact, ModelInferenceError, ModelLoadError, RiskModel,
};
pub use prediction::{AssessmentOutcome, PopulationCaveat, RiskLabel};
pub use report::{
    RenderedDocument, Report, ReportEntry, ReportFormatter, REPORT_CONTENT_TYPE, REPORT_FILE_NAME,
};
pub use resources::{help_resources, HelpResource};
pub use router::{assessment_router, AssessmentRequest, AssessmentResponse};
pub use service::{AssessmentError, AssessmentService};
