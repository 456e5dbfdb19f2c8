use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Every question on the assessment form, in the order the form asks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormField {
    Age,
    Gender,
    PlaceOfResidence,
    EducationalStatus,
    SocioEconomicStatus,
    Parity,
    AgeAtFirstPregnancy,
    MenstrualCycle,
    MenstrualHygiene,
    Contraception,
    Smoking,
    #[serde(rename = "HighRiskHPV")]
    HighRiskHpv,
    #[serde(rename = "IL6")]
    Il6,
    #[serde(rename = "IL1beta")]
    Il1Beta,
    #[serde(rename = "TNFalpha")]
    TnfAlpha,
    #[serde(rename = "IL1RN")]
    Il1Rn,
}

impl FormField {
    pub const fn ordered() -> [Self; 16] {
        [
            Self::Age,
            Self::Gender,
            Self::PlaceOfResidence,
            Self::EducationalStatus,
            Self::SocioEconomicStatus,
            Self::Parity,
            Self::AgeAtFirstPregnancy,
            Self::MenstrualCycle,
            Self::MenstrualHygiene,
            Self::Contraception,
            Self::Smoking,
            Self::HighRiskHpv,
            Self::Il6,
            Self::Il1Beta,
            Self::TnfAlpha,
            Self::Il1Rn,
        ]
    }

    /// Canonical key used in JSON payloads and CSV headers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::PlaceOfResidence => "PlaceOfResidence",
            Self::EducationalStatus => "EducationalStatus",
            Self::SocioEconomicStatus => "SocioEconomicStatus",
            Self::Parity => "Parity",
            Self::AgeAtFirstPregnancy => "AgeAtFirstPregnancy",
            Self::MenstrualCycle => "MenstrualCycle",
            Self::MenstrualHygiene => "MenstrualHygiene",
            Self::Contraception => "Contraception",
            Self::Smoking => "Smoking",
            Self::HighRiskHpv => "HighRiskHPV",
            Self::Il6 => "IL6",
            Self::Il1Beta => "IL1beta",
            Self::TnfAlpha => "TNFalpha",
            Self::Il1Rn => "IL1RN",
        }
    }

    /// Label printed next to the answer in the downloadable report.
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::PlaceOfResidence => "PoR",
            Self::EducationalStatus => "Education",
            Self::SocioEconomicStatus => "SES",
            Self::Parity => "Parity",
            Self::AgeAtFirstPregnancy => "First Pregnancy Age",
            Self::MenstrualCycle => "Menstrual Cycle",
            Self::MenstrualHygiene => "Menstrual Hygiene",
            Self::Contraception => "Contraception",
            Self::Smoking => "Smoking",
            Self::HighRiskHpv => "HPV",
            Self::Il6 => "IL6",
            Self::Il1Beta => "IL1beta",
            Self::TnfAlpha => "TNFalpha",
            Self::Il1Rn => "IL1RN",
        }
    }

    /// Resolve a payload key, tolerating case, spaces, underscores and dashes.
    pub fn from_key(key: &str) -> Option<Self> {
        let wanted = normalize_key(key);
        Self::ordered()
            .into_iter()
            .find(|field| normalize_key(field.name()) == wanted)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn normalize_key(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceOfResidence {
    Rural,
    Urban,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EducationalStatus {
    Illiterate,
    Literate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocioEconomicStatus {
    Lower,
    Middle,
    Upper,
}

/// Number of previous full-term pregnancies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Zero,
    UpToTwo,
    MoreThanTwo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeAtFirstPregnancy {
    TwentyOrYounger,
    OlderThanTwenty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenstrualCycle {
    Regular,
    Irregular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenstrualHygiene {
    Napkin,
    Cloths,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contraception {
    OralPills,
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Smoking {
    Passive,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighRiskHpv {
    Negative,
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Il6Genotype {
    Gg,
    Aa,
    Ag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Il1BetaGenotype {
    Tt,
    Ct,
    Cc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TnfAlphaGenotype {
    Gg,
    Aa,
    Ga,
}

/// IL1RN VNTR allele pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Il1RnGenotype {
    OneOne,
    TwoTwo,
    OneTwo,
    OneFour,
    TwoThree,
    OneThree,
    TwoFour,
}

/// Age in whole years, restricted to the form's 1-110 slider range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u8);

impl Age {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 110;

    pub fn new(years: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&years) {
            Some(Self(years as u8))
        } else {
            None
        }
    }

    pub const fn years(self) -> u8 {
        self.0
    }
}

/// Fully decoded answers for one submission. Only the codec constructs this,
/// so every field is guaranteed to be inside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormAnswers {
    pub age: Age,
    pub gender: Gender,
    pub place_of_residence: PlaceOfResidence,
    pub educational_status: EducationalStatus,
    pub socio_economic_status: SocioEconomicStatus,
    pub parity: Parity,
    pub age_at_first_pregnancy: AgeAtFirstPregnancy,
    pub menstrual_cycle: MenstrualCycle,
    pub menstrual_hygiene: MenstrualHygiene,
    pub contraception: Contraception,
    pub smoking: Smoking,
    pub high_risk_hpv: HighRiskHpv,
    pub il6: Il6Genotype,
    pub il1_beta: Il1BetaGenotype,
    pub tnf_alpha: TnfAlphaGenotype,
    pub il1_rn: Il1RnGenotype,
}

/// Free-text identity captured alongside the form. Never fed to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl PatientDetails {
    pub const FALLBACK_NAME: &'static str = "Patient";

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(Self::FALLBACK_NAME)
    }
}

/// A single untyped answer as it arrives from JSON or CSV.
///
/// JSON `null` is kept as [`RawValue::Null`] and any other non-scalar value as
/// [`RawValue::Unsupported`] so the codec can reject them with the field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "serde_json::Value")]
pub enum RawValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Null,
    Unsupported(serde_json::Value),
}

impl RawValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawValue::Integer(value) => Cow::Owned(value.to_string()),
            RawValue::Decimal(value) => Cow::Owned(value.to_string()),
            RawValue::Text(value) => Cow::Borrowed(value.as_str()),
            RawValue::Null => Cow::Borrowed(""),
            RawValue::Unsupported(value) => Cow::Owned(value.to_string()),
        }
    }

    /// Null or whitespace-only text: the question was left unanswered.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::String(text) => RawValue::Text(text),
            serde_json::Value::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(integer), _) => RawValue::Integer(integer),
                (None, Some(decimal)) => RawValue::Decimal(decimal),
                (None, None) => RawValue::Unsupported(serde_json::Value::Number(number)),
            },
            other => RawValue::Unsupported(other),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

/// Field name to raw answer mapping submitted by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnswers(BTreeMap<String, RawValue>);

impl RawAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, field: FormField) -> Option<RawValue> {
        let key = self
            .0
            .keys()
            .find(|key| FormField::from_key(key) == Some(field))
            .cloned()?;
        self.0.remove(&key)
    }

    /// Look up the answer for `field` under any accepted spelling of its key.
    pub fn get(&self, field: FormField) -> Option<&RawValue> {
        self.0
            .iter()
            .find(|(key, _)| FormField::from_key(key) == Some(field))
            .map(|(_, value)| value)
    }

    /// First form field, in form order, that more than one key resolves to.
    pub fn duplicated_field(&self) -> Option<FormField> {
        FormField::ordered().into_iter().find(|field| {
            self.0
                .keys()
                .filter(|key| FormField::from_key(key) == Some(*field))
                .nth(1)
                .is_some()
        })
    }

    /// Keys that do not name any form field.
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .filter(|key| FormField::from_key(key).is_none())
            .map(String::as_str)
    }
}

impl From<BTreeMap<String, RawValue>> for RawAnswers {
    fn from(value: BTreeMap<String, RawValue>) -> Self {
        Self(value)
    }
}

/// One form submission: identity details plus the raw answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub patient: PatientDetails,
    pub answers: RawAnswers,
}
