use serde::{Deserialize, Serialize};

use super::domain::Gender;
use super::features::FeatureVector;
use super::model::ModelInferenceError;

/// Binary classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    NoRisk,
    AtRisk,
}

impl RiskLabel {
    pub const fn class(self) -> u8 {
        match self {
            Self::NoRisk => 0,
            Self::AtRisk => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoRisk => "No Risk",
            Self::AtRisk => "At Risk",
        }
    }
}

impl TryFrom<u8> for RiskLabel {
    type Error = ModelInferenceError;

    fn try_from(class: u8) -> Result<Self, Self::Error> {
        match class {
            0 => Ok(Self::NoRisk),
            1 => Ok(Self::AtRisk),
            other => Err(ModelInferenceError::UnexpectedClass(other)),
        }
    }
}

/// Non-blocking validity warning attached to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationCaveat {
    /// The model was trained on biological females only.
    OutsideIntendedPopulation,
}

impl PopulationCaveat {
    pub fn for_gender(gender: Gender) -> Option<Self> {
        match gender {
            Gender::Male => Some(Self::OutsideIntendedPopulation),
            Gender::Female => None,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::OutsideIntendedPopulation => {
                "This prediction tool is intended for biological females. Your result may be invalid."
            }
        }
    }
}

/// Everything the presentation layer needs to show one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub label: RiskLabel,
    pub label_text: &'static str,
    pub display_name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caveat: Option<PopulationCaveat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caveat_message: Option<&'static str>,
    pub features: FeatureVector,
}

impl AssessmentOutcome {
    pub fn new(
        label: RiskLabel,
        display_name: &str,
        caveat: Option<PopulationCaveat>,
        features: FeatureVector,
    ) -> Self {
        let message = match label {
            RiskLabel::AtRisk => format!("{display_name}, you may have a risk of Cervical Cancer."),
            RiskLabel::NoRisk => {
                format!("{display_name}, no indication of Cervical Cancer risk was found.")
            }
        };

        Self {
            label,
            label_text: label.label(),
            display_name: display_name.to_string(),
            message,
            caveat,
            caveat_message: caveat.map(PopulationCaveat::message),
            features,
        }
    }

    pub fn has_caveat(&self) -> bool {
        self.caveat.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_round_trips_through_label() {
        for label in [RiskLabel::NoRisk, RiskLabel::AtRisk] {
            assert_eq!(RiskLabel::try_from(label.class()).expect("valid"), label);
        }
    }

    #[test]
    fn malformed_class_is_rejected() {
        match RiskLabel::try_from(2) {
            Err(ModelInferenceError::UnexpectedClass(2)) => {}
            other => panic!("expected unexpected class error, got {other:?}"),
        }
    }

    #[test]
    fn caveat_only_applies_to_male_submissions() {
        assert_eq!(
            PopulationCaveat::for_gender(Gender::Male),
            Some(PopulationCaveat::OutsideIntendedPopulation)
        );
        assert_eq!(PopulationCaveat::for_gender(Gender::Female), None);
    }
}
