use cervical_risk::assessment::{LinearRiskModel, ModelLoadError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the risk model once at startup. Callers treat failure as fatal.
pub(crate) fn load_model(path: &Path) -> Result<LinearRiskModel, ModelLoadError> {
    LinearRiskModel::from_path(path).map_err(|err| {
        error!(path = %path.display(), error = %err, "risk model failed to load");
        err
    })
}
