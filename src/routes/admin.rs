use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/reload-model", post(reload_model))
}

/// Swap in a freshly loaded scoring model after a model-version upgrade.
pub async fn reload_model(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    info!("POST /admin/reload-model - Reloading scoring model");
    state.model_registry.reload().map_err(|e| {
        error!("Model reload failed: {}", e);
        AppError::Scorer(e.to_string())
    })?;
    Ok(StatusCode::OK)
}
