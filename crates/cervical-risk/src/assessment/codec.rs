//! Category codec: the per-field answer to integer tables the model was trained on.
//!
//! The code directions are not consistent across fields (e.g. `Urban` codes higher
//! than `Rural` while `Active` smoking codes lower than `Passive`). They must match
//! the training data exactly and are kept as-is.

use std::fmt;

use super::domain::{
    Age, AgeAtFirstPregnancy, Contraception, EducationalStatus, FormAnswers, FormField, Gender,
    HighRiskHpv, Il1BetaGenotype, Il1RnGenotype, Il6Genotype, MenstrualCycle, MenstrualHygiene,
    Parity, PlaceOfResidence, RawAnswers, RawValue, Smoking, SocioEconomicStatus,
    TnfAlphaGenotype,
};

/// Raised when a submission cannot be turned into model input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("missing answer for {field}")]
    MissingField { field: FormField },
    #[error("'{value}' is not a valid answer for {field}")]
    UnknownValue { field: FormField, value: String },
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: FormField, value: String },
    #[error("{field} was answered more than once")]
    DuplicateField { field: FormField },
    #[error("Age {value} out of range [{min}, {max}]", min = Age::MIN, max = Age::MAX)]
    AgeOutOfRange { value: i64 },
}

impl EncodingError {
    /// The form field the error refers to.
    pub fn field(&self) -> FormField {
        match self {
            EncodingError::MissingField { field }
            | EncodingError::UnknownValue { field, .. }
            | EncodingError::InvalidNumber { field, .. }
            | EncodingError::DuplicateField { field } => *field,
            EncodingError::AgeOutOfRange { .. } => FormField::Age,
        }
    }
}

/// A categorical form answer with a fixed integer code.
pub trait Category: Copy + Eq + fmt::Debug + Sized + 'static {
    const FIELD: FormField;
    /// Every domain value, in the order the form offers them.
    const ALL: &'static [Self];

    fn code(self) -> u8;

    /// Canonical spelling shown on the form and in the report.
    fn label(self) -> &'static str;

    /// Extra spellings accepted on input.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }
}

/// Decode a free-text answer into its category.
///
/// Matching trims the input, collapses inner whitespace and ignores ASCII case.
pub fn decode<C: Category>(raw: &str) -> Result<C, EncodingError> {
    let candidate = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    C::ALL
        .iter()
        .copied()
        .find(|value| {
            value.label().eq_ignore_ascii_case(&candidate)
                || value
                    .aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(&candidate))
        })
        .ok_or_else(|| EncodingError::UnknownValue {
            field: C::FIELD,
            value: raw.to_string(),
        })
}

impl Category for Gender {
    const FIELD: FormField = FormField::Gender;
    const ALL: &'static [Self] = &[Self::Female, Self::Male];

    fn code(self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl Category for PlaceOfResidence {
    const FIELD: FormField = FormField::PlaceOfResidence;
    const ALL: &'static [Self] = &[Self::Rural, Self::Urban];

    fn code(self) -> u8 {
        match self {
            Self::Urban => 2,
            Self::Rural => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Rural => "Rural",
            Self::Urban => "Urban",
        }
    }
}

impl Category for EducationalStatus {
    const FIELD: FormField = FormField::EducationalStatus;
    const ALL: &'static [Self] = &[Self::Illiterate, Self::Literate];

    fn code(self) -> u8 {
        match self {
            Self::Literate => 2,
            Self::Illiterate => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Illiterate => "Illiterate",
            Self::Literate => "Literate",
        }
    }
}

impl Category for SocioEconomicStatus {
    const FIELD: FormField = FormField::SocioEconomicStatus;
    const ALL: &'static [Self] = &[Self::Lower, Self::Middle, Self::Upper];

    fn code(self) -> u8 {
        match self {
            Self::Lower => 3,
            Self::Middle => 2,
            Self::Upper => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Lower => "Lower",
            Self::Middle => "Middle",
            Self::Upper => "Upper",
        }
    }
}

impl Category for Parity {
    const FIELD: FormField = FormField::Parity;
    const ALL: &'static [Self] = &[Self::Zero, Self::UpToTwo, Self::MoreThanTwo];

    fn code(self) -> u8 {
        match self {
            Self::Zero => 1,
            Self::UpToTwo => 2,
            Self::MoreThanTwo => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Zero => "None",
            Self::UpToTwo => "≤2",
            Self::MoreThanTwo => "more_than_2",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Zero => &[],
            Self::UpToTwo => &["<=2"],
            Self::MoreThanTwo => &[">2"],
        }
    }
}

impl Category for AgeAtFirstPregnancy {
    const FIELD: FormField = FormField::AgeAtFirstPregnancy;
    const ALL: &'static [Self] = &[Self::TwentyOrYounger, Self::OlderThanTwenty];

    fn code(self) -> u8 {
        match self {
            Self::TwentyOrYounger => 1,
            Self::OlderThanTwenty => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::TwentyOrYounger => "≤20",
            Self::OlderThanTwenty => "more_than_20",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::TwentyOrYounger => &["<=20"],
            Self::OlderThanTwenty => &[">20"],
        }
    }
}

impl Category for MenstrualCycle {
    const FIELD: FormField = FormField::MenstrualCycle;
    const ALL: &'static [Self] = &[Self::Regular, Self::Irregular];

    fn code(self) -> u8 {
        match self {
            Self::Regular => 1,
            Self::Irregular => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Irregular => "Irregular",
        }
    }
}

impl Category for MenstrualHygiene {
    const FIELD: FormField = FormField::MenstrualHygiene;
    const ALL: &'static [Self] = &[Self::Napkin, Self::Cloths];

    fn code(self) -> u8 {
        match self {
            Self::Napkin => 1,
            Self::Cloths => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Napkin => "Napkin",
            Self::Cloths => "Cloths",
        }
    }
}

impl Category for Contraception {
    const FIELD: FormField = FormField::Contraception;
    const ALL: &'static [Self] = &[Self::OralPills, Self::Others];

    fn code(self) -> u8 {
        match self {
            Self::Others => 2,
            Self::OralPills => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::OralPills => "OralPills",
            Self::Others => "Others",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::OralPills => &["Oral contraceptive pills", "Oral Pills"],
            Self::Others => &[],
        }
    }
}

impl Category for Smoking {
    const FIELD: FormField = FormField::Smoking;
    const ALL: &'static [Self] = &[Self::Passive, Self::Active];

    fn code(self) -> u8 {
        match self {
            Self::Active => 1,
            Self::Passive => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Passive => "Passive",
            Self::Active => "Active",
        }
    }
}

impl Category for HighRiskHpv {
    const FIELD: FormField = FormField::HighRiskHpv;
    const ALL: &'static [Self] = &[Self::Negative, Self::Positive];

    fn code(self) -> u8 {
        match self {
            Self::Positive => 2,
            Self::Negative => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Negative => "Negative",
            Self::Positive => "Positive",
        }
    }
}

impl Category for Il6Genotype {
    const FIELD: FormField = FormField::Il6;
    const ALL: &'static [Self] = &[Self::Gg, Self::Aa, Self::Ag];

    fn code(self) -> u8 {
        match self {
            Self::Ag => 2,
            Self::Aa => 1,
            Self::Gg => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Gg => "GG",
            Self::Aa => "AA",
            Self::Ag => "AG",
        }
    }
}

impl Category for Il1BetaGenotype {
    const FIELD: FormField = FormField::Il1Beta;
    const ALL: &'static [Self] = &[Self::Tt, Self::Ct, Self::Cc];

    fn code(self) -> u8 {
        match self {
            Self::Tt => 1,
            Self::Ct => 2,
            Self::Cc => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Tt => "TT",
            Self::Ct => "CT",
            Self::Cc => "CC",
        }
    }
}

impl Category for TnfAlphaGenotype {
    const FIELD: FormField = FormField::TnfAlpha;
    const ALL: &'static [Self] = &[Self::Gg, Self::Aa, Self::Ga];

    fn code(self) -> u8 {
        match self {
            Self::Gg => 1,
            Self::Aa => 2,
            Self::Ga => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Gg => "GG",
            Self::Aa => "AA",
            Self::Ga => "GA",
        }
    }
}

impl Category for Il1RnGenotype {
    const FIELD: FormField = FormField::Il1Rn;
    const ALL: &'static [Self] = &[
        Self::OneOne,
        Self::TwoTwo,
        Self::OneTwo,
        Self::OneFour,
        Self::TwoThree,
        Self::OneThree,
        Self::TwoFour,
    ];

    fn code(self) -> u8 {
        match self {
            Self::OneOne => 1,
            Self::TwoTwo => 2,
            Self::OneTwo => 3,
            Self::OneFour => 4,
            Self::TwoThree => 5,
            Self::OneThree => 6,
            Self::TwoFour => 7,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::OneOne => "I I",
            Self::TwoTwo => "II II",
            Self::OneTwo => "I II",
            Self::OneFour => "I IV",
            Self::TwoThree => "II III",
            Self::OneThree => "I III",
            Self::TwoFour => "II IV",
        }
    }
}

fn require(raw: &RawAnswers, field: FormField) -> Result<&RawValue, EncodingError> {
    raw.get(field)
        .filter(|value| !value.is_blank())
        .ok_or(EncodingError::MissingField { field })
}

fn decode_field<C: Category>(raw: &RawAnswers) -> Result<C, EncodingError> {
    match require(raw, C::FIELD)? {
        RawValue::Text(text) => decode(text),
        other => Err(EncodingError::UnknownValue {
            field: C::FIELD,
            value: other.as_text().into_owned(),
        }),
    }
}

fn decode_age(raw: &RawAnswers) -> Result<Age, EncodingError> {
    let field = FormField::Age;
    let invalid = |value: &RawValue| EncodingError::InvalidNumber {
        field,
        value: value.as_text().into_owned(),
    };

    let value = require(raw, field)?;
    let years = match value {
        RawValue::Integer(years) => *years,
        RawValue::Decimal(years) if years.is_finite() && years.fract() == 0.0 => *years as i64,
        RawValue::Text(text) => text.trim().parse::<i64>().map_err(|_| invalid(value))?,
        _ => return Err(invalid(value)),
    };

    Age::new(years).ok_or(EncodingError::AgeOutOfRange { value: years })
}

impl FormAnswers {
    /// Decode every form field, failing on the first missing or out-of-domain answer.
    ///
    /// Two keys that resolve to the same field are rejected rather than picking one.
    pub fn from_raw(raw: &RawAnswers) -> Result<Self, EncodingError> {
        if let Some(field) = raw.duplicated_field() {
            return Err(EncodingError::DuplicateField { field });
        }
        for key in raw.unrecognized_keys() {
            tracing::debug!(key, "ignoring answer for unknown form field");
        }

        Ok(Self {
            age: decode_age(raw)?,
            gender: decode_field(raw)?,
            place_of_residence: decode_field(raw)?,
            educational_status: decode_field(raw)?,
            socio_economic_status: decode_field(raw)?,
            parity: decode_field(raw)?,
            age_at_first_pregnancy: decode_field(raw)?,
            menstrual_cycle: decode_field(raw)?,
            menstrual_hygiene: decode_field(raw)?,
            contraception: decode_field(raw)?,
            smoking: decode_field(raw)?,
            high_risk_hpv: decode_field(raw)?,
            il6: decode_field(raw)?,
            il1_beta: decode_field(raw)?,
            tnf_alpha: decode_field(raw)?,
            il1_rn: decode_field(raw)?,
        })
    }

    /// Display text for each answer, in form order.
    pub fn answer_labels(&self) -> [(FormField, String); 16] {
        [
            (FormField::Age, self.age.years().to_string()),
            (FormField::Gender, self.gender.label().to_string()),
            (
                FormField::PlaceOfResidence,
                self.place_of_residence.label().to_string(),
            ),
            (
                FormField::EducationalStatus,
                self.educational_status.label().to_string(),
            ),
            (
                FormField::SocioEconomicStatus,
                self.socio_economic_status.label().to_string(),
            ),
            (FormField::Parity, self.parity.label().to_string()),
            (
                FormField::AgeAtFirstPregnancy,
                self.age_at_first_pregnancy.label().to_string(),
            ),
            (
                FormField::MenstrualCycle,
                self.menstrual_cycle.label().to_string(),
            ),
            (
                FormField::MenstrualHygiene,
                self.menstrual_hygiene.label().to_string(),
            ),
            (
                FormField::Contraception,
                self.contraception.label().to_string(),
            ),
            (FormField::Smoking, self.smoking.label().to_string()),
            (FormField::HighRiskHpv, self.high_risk_hpv.label().to_string()),
            (FormField::Il6, self.il6.label().to_string()),
            (FormField::Il1Beta, self.il1_beta.label().to_string()),
            (FormField::TnfAlpha, self.tnf_alpha.label().to_string()),
            (FormField::Il1Rn, self.il1_rn.label().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_table<C: Category>(expected: &[(&str, u8)]) {
        assert_eq!(
            C::ALL.len(),
            expected.len(),
            "{} domain size drifted",
            C::FIELD
        );
        for (label, code) in expected {
            let value: C = decode(label).unwrap_or_else(|err| panic!("{err}"));
            assert_eq!(value.code(), *code, "{} {label}", C::FIELD);
            assert_eq!(value.label(), *label);
        }
    }

    #[test]
    fn every_domain_value_maps_to_its_documented_code() {
        assert_table::<Gender>(&[("Male", 1), ("Female", 0)]);
        assert_table::<PlaceOfResidence>(&[("Urban", 2), ("Rural", 0)]);
        assert_table::<EducationalStatus>(&[("Literate", 2), ("Illiterate", 1)]);
        assert_table::<SocioEconomicStatus>(&[("Lower", 3), ("Middle", 2), ("Upper", 1)]);
        assert_table::<Parity>(&[("None", 1), ("≤2", 2), ("more_than_2", 3)]);
        assert_table::<AgeAtFirstPregnancy>(&[("≤20", 1), ("more_than_20", 2)]);
        assert_table::<MenstrualCycle>(&[("Regular", 1), ("Irregular", 2)]);
        assert_table::<MenstrualHygiene>(&[("Napkin", 1), ("Cloths", 2)]);
        assert_table::<Contraception>(&[("Others", 2), ("OralPills", 1)]);
        assert_table::<Smoking>(&[("Active", 1), ("Passive", 2)]);
        assert_table::<HighRiskHpv>(&[("Positive", 2), ("Negative", 1)]);
        assert_table::<Il6Genotype>(&[("AG", 2), ("AA", 1), ("GG", 3)]);
        assert_table::<Il1BetaGenotype>(&[("TT", 1), ("CT", 2), ("CC", 3)]);
        assert_table::<TnfAlphaGenotype>(&[("GG", 1), ("AA", 2), ("GA", 3)]);
        assert_table::<Il1RnGenotype>(&[
            ("I I", 1),
            ("II II", 2),
            ("I II", 3),
            ("I IV", 4),
            ("II III", 5),
            ("I III", 6),
            ("II IV", 7),
        ]);
    }

    #[test]
    fn decode_tolerates_case_whitespace_and_form_aliases() {
        assert_eq!(decode::<Smoking>("  active "), Ok(Smoking::Active));
        assert_eq!(decode::<Il1RnGenotype>("II   III"), Ok(Il1RnGenotype::TwoThree));
        assert_eq!(decode::<Parity>("<=2"), Ok(Parity::UpToTwo));
        assert_eq!(decode::<Parity>(">2"), Ok(Parity::MoreThanTwo));
        assert_eq!(
            decode::<AgeAtFirstPregnancy>("<=20"),
            Ok(AgeAtFirstPregnancy::TwentyOrYounger)
        );
        assert_eq!(
            decode::<AgeAtFirstPregnancy>(">20"),
            Ok(AgeAtFirstPregnancy::OlderThanTwenty)
        );
        assert_eq!(
            decode::<Contraception>("Oral contraceptive pills"),
            Ok(Contraception::OralPills)
        );
        assert_eq!(decode::<Contraception>("oral pills"), Ok(Contraception::OralPills));
    }

    #[test]
    fn genotype_letter_order_is_significant() {
        assert!(decode::<Il6Genotype>("GA").is_err());
        assert!(decode::<TnfAlphaGenotype>("AG").is_err());
        assert!(decode::<Il1BetaGenotype>("TC").is_err());
    }

    #[test]
    fn unknown_value_names_field() {
        let err = decode::<SocioEconomicStatus>("Unknown").expect_err("out of domain");
        assert_eq!(
            err,
            EncodingError::UnknownValue {
                field: FormField::SocioEconomicStatus,
                value: "Unknown".to_string(),
            }
        );
        assert_eq!(err.field(), FormField::SocioEconomicStatus);
        assert!(err.to_string().contains("SocioEconomicStatus"));
    }

    #[test]
    fn age_error_messages_report_bounds() {
        let err = EncodingError::AgeOutOfRange { value: 140 };
        assert_eq!(err.to_string(), "Age 140 out of range [1, 110]");
        assert_eq!(err.field(), FormField::Age);
    }
}
