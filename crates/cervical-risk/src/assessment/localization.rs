use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages the form's static labels are translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language '{0}'")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Hindi,
        Language::Spanish,
        Language::French,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Spanish => "es",
            Language::French => "fr",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Spanish => "Spanish",
            Language::French => "French",
        }
    }

    /// Accepts the two-letter code or the English language name.
    pub fn from_code(value: &str) -> Result<Self, UnknownLanguage> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|language| {
                language.code().eq_ignore_ascii_case(value)
                    || language.display_name().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| UnknownLanguage(value.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Static labels shown on the form.
pub const STATIC_LABELS: [&str; 6] = [
    "Patient Details",
    "Name",
    "Location",
    "Country",
    "Submit",
    "Download PDF Report",
];

/// Translate a static label. Labels without a translation pass through unchanged.
pub fn translate(label: &str, language: Language) -> &str {
    let translated = match (label, language) {
        (_, Language::English) => None,
        ("Patient Details", Language::Hindi) => Some("रोगी का विवरण"),
        ("Patient Details", Language::Spanish) => Some("Detalles del paciente"),
        ("Patient Details", Language::French) => Some("Détails du patient"),
        ("Name", Language::Hindi) => Some("नाम"),
        ("Name", Language::Spanish) => Some("Nombre"),
        ("Name", Language::French) => Some("Nom"),
        ("Location", Language::Hindi) => Some("स्थान"),
        ("Location", Language::Spanish) => Some("Ubicación"),
        ("Location", Language::French) => Some("Emplacement"),
        ("Country", Language::Hindi) => Some("देश"),
        ("Country", Language::Spanish) => Some("País"),
        ("Country", Language::French) => Some("Pays"),
        ("Submit", Language::Hindi) => Some("जमा करें"),
        ("Submit", Language::Spanish) => Some("Enviar"),
        ("Submit", Language::French) => Some("Soumettre"),
        ("Download PDF Report", Language::Hindi) => Some("पीडीएफ रिपोर्ट डाउनलोड करें"),
        ("Download PDF Report", Language::Spanish) => Some("Descargar informe PDF"),
        ("Download PDF Report", Language::French) => Some("Télécharger le rapport PDF"),
        _ => None,
    };

    translated.unwrap_or(label)
}

/// Every static label paired with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSet {
    pub language: Language,
    pub labels: Vec<LocalizedLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedLabel {
    pub key: &'static str,
    pub text: &'static str,
}

impl LabelSet {
    pub fn for_language(language: Language) -> Self {
        let labels = STATIC_LABELS
            .into_iter()
            .map(|key| LocalizedLabel {
                key,
                text: translate(key, language),
            })
            .collect();

        Self { language, labels }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|label| label.key == key)
            .map(|label| label.text)
    }
}
