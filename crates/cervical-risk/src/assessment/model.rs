//! Risk model port and the logistic-regression artifact adapter.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::features::{feature_names, FeatureVector, FEATURE_COUNT};

/// Opaque binary classifier. Implementations must be immutable after load.
pub trait RiskModel: Send + Sync {
    /// Return the predicted class for one vector: 0 (no risk) or 1 (at risk).
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelInferenceError>;
}

/// The model artifact could not be loaded. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model was trained on features {found:?}, expected {expected:?}")]
    FeatureLayout {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("model {name} has {found} entries, expected {expected}")]
    Shape {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("model {name} contains a non-finite value")]
    NonFinite { name: &'static str },
    #[error("model scaler_scale[{index}] must be non-zero")]
    ZeroScale { index: usize },
    #[error("model threshold {0} must lie in (0, 1)")]
    Threshold(f64),
}

/// The model call failed or produced something other than a class label.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelInferenceError {
    #[error("model produced a non-finite score")]
    NonFiniteScore,
    #[error("model returned class {0}, expected 0 or 1")]
    UnexpectedClass(u8),
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

fn default_threshold() -> f64 {
    0.5
}

/// Serialized form of a trained logistic-regression classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Logistic-regression classifier loaded once from a JSON artifact.
#[derive(Debug, Clone)]
pub struct LinearRiskModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
    threshold: f64,
}

impl LinearRiskModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), threshold = model.threshold, "risk model loaded");
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        let expected = feature_names();
        if artifact.feature_names.len() != FEATURE_COUNT
            || artifact
                .feature_names
                .iter()
                .zip(expected.iter())
                .any(|(found, wanted)| found != wanted)
        {
            return Err(ModelLoadError::FeatureLayout {
                expected: expected.iter().map(|name| name.to_string()).collect(),
                found: artifact.feature_names,
            });
        }

        let coefficients = fixed("coefficients", &artifact.coefficients)?;
        let mean = match &artifact.scaler_mean {
            Some(values) => fixed("scaler_mean", values)?,
            None => [0.0; FEATURE_COUNT],
        };
        let scale = match &artifact.scaler_scale {
            Some(values) => fixed("scaler_scale", values)?,
            None => [1.0; FEATURE_COUNT],
        };
        if let Some(index) = scale.iter().position(|value| *value == 0.0) {
            return Err(ModelLoadError::ZeroScale { index });
        }

        if !artifact.intercept.is_finite() {
            return Err(ModelLoadError::NonFinite { name: "intercept" });
        }
        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(ModelLoadError::Threshold(artifact.threshold));
        }

        Ok(Self {
            coefficients,
            intercept: artifact.intercept,
            mean,
            scale,
            threshold: artifact.threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Probability of the positive class.
    pub fn probability(&self, features: &FeatureVector) -> Result<f64, ModelInferenceError> {
        let score = features
            .values()
            .iter()
            .enumerate()
            .map(|(index, value)| {
                self.coefficients[index] * (value - self.mean[index]) / self.scale[index]
            })
            .sum::<f64>()
            + self.intercept;

        if !score.is_finite() {
            return Err(ModelInferenceError::NonFiniteScore);
        }

        Ok(1.0 / (1.0 + (-score).exp()))
    }
}

impl RiskModel for LinearRiskModel {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelInferenceError> {
        let probability = self.probability(features)?;
        tracing::debug!(probability, "risk model scored submission");
        Ok(u8::from(probability >= self.threshold))
    }
}

fn fixed(name: &'static str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ModelLoadError> {
    let array: [f64; FEATURE_COUNT] =
        values
            .try_into()
            .map_err(|_| ModelLoadError::Shape {
                name,
                expected: FEATURE_COUNT,
                found: values.len(),
            })?;
    if array.iter().any(|value| !value.is_finite()) {
        return Err(ModelLoadError::NonFinite { name });
    }
    Ok(array)
}
