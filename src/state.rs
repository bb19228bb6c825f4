use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::external::onnx_scorer::ModelRegistry;
use crate::external::scorer::ScorerMode;
use crate::services::features::FeatureSpec;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Catalogs artifact; fixes the feature-vector width for this deployment.
    pub feature_spec: Arc<FeatureSpec>,
    /// Load-once cache for the trained scorer.
    pub model_registry: Arc<ModelRegistry>,
    pub scorer_mode: ScorerMode,
    /// Per-request ceiling on the whole scorer loop.
    pub forecast_timeout: Duration,
}
