//! Feature vector builder.
//!
//! The model consumes exactly [`FEATURE_COUNT`] values in [`FEATURE_LAYOUT`] order.
//! Gender is collected by the form but is not a model input.

use serde::Serialize;

use super::codec::{Category, EncodingError};
use super::domain::{FormAnswers, FormField, RawAnswers};

pub const FEATURE_COUNT: usize = 15;

/// Slot order of the model input. Changing it invalidates every trained artifact.
pub const FEATURE_LAYOUT: [FormField; FEATURE_COUNT] = [
    FormField::Age,
    FormField::PlaceOfResidence,
    FormField::EducationalStatus,
    FormField::SocioEconomicStatus,
    FormField::Parity,
    FormField::AgeAtFirstPregnancy,
    FormField::MenstrualCycle,
    FormField::MenstrualHygiene,
    FormField::Contraception,
    FormField::Smoking,
    FormField::HighRiskHpv,
    FormField::Il6,
    FormField::Il1Beta,
    FormField::TnfAlpha,
    FormField::Il1Rn,
];

pub fn feature_names() -> [&'static str; FEATURE_COUNT] {
    FEATURE_LAYOUT.map(FormField::name)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_answers(answers: &FormAnswers) -> Self {
        let code = |value: u8| f64::from(value);

        Self([
            f64::from(answers.age.years()),
            code(answers.place_of_residence.code()),
            code(answers.educational_status.code()),
            code(answers.socio_economic_status.code()),
            code(answers.parity.code()),
            code(answers.age_at_first_pregnancy.code()),
            code(answers.menstrual_cycle.code()),
            code(answers.menstrual_hygiene.code()),
            code(answers.contraception.code()),
            code(answers.smoking.code()),
            code(answers.high_risk_hpv.code()),
            code(answers.il6.code()),
            code(answers.il1_beta.code()),
            code(answers.tnf_alpha.code()),
            code(answers.il1_rn.code()),
        ])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, field: FormField) -> Option<f64> {
        FEATURE_LAYOUT
            .iter()
            .position(|slot| *slot == field)
            .map(|index| self.0[index])
    }
}

/// Decode and encode a raw submission in one step. No vector is produced on error.
pub fn encode(raw: &RawAnswers) -> Result<FeatureVector, EncodingError> {
    let answers = FormAnswers::from_raw(raw)?;
    Ok(FeatureVector::from_answers(&answers))
}
