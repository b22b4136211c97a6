use metrics_exporter_prometheus::PrometheusHandle;
use sentify::customers::{CustomerDataset, ScoringClient};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Liveness/metrics plumbing shared by the operational endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the customer endpoints need: the dataset handle, the scoring
/// gateway client, and the feature-schema manifest location.
#[derive(Clone)]
pub(crate) struct DashboardState {
    pub(crate) dataset: Arc<CustomerDataset>,
    pub(crate) scoring: Arc<ScoringClient>,
    pub(crate) schema_path: Arc<PathBuf>,
}
