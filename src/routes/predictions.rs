use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::db;
use crate::errors::AppError;
use crate::models::{ForecastRequest, PriceForecast, PricePrediction};
use crate::services::forecast_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forecast", post(create_forecast))
        .route("/:product/:city", get(get_stored_predictions))
}

/// Run the forecast engine for a (product, city) pair.
pub async fn create_forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<PriceForecast>, AppError> {
    info!(
        "POST /predictions/forecast - {} in {} for {} days",
        request.product, request.city, request.days
    );

    let forecast = forecast_service::generate_forecast(&state, request)
        .await
        .map_err(|e| {
            match &e {
                AppError::NotFound(_) | AppError::InsufficientHistory { .. } => {
                    warn!("Forecast rejected: {}", e)
                }
                AppError::SchemaMismatch { .. } => {
                    // Catalog/model version drift is a deployment bug.
                    error!("FEATURE SCHEMA MISMATCH - check model and catalog versions: {}", e)
                }
                _ => error!("Forecast failed: {}", e),
            }
            e
        })?;

    Ok(Json(forecast))
}

/// Previously persisted predictions, newest first.
pub async fn get_stored_predictions(
    Path((product, city)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PricePrediction>>, AppError> {
    info!("GET /predictions/{}/{} - Getting stored predictions", product, city);
    let predictions = db::prediction_queries::fetch_for_product_city(&state.pool, &product, &city)
        .await
        .map_err(|e| {
            error!("Failed to fetch stored predictions for {} in {}: {}", product, city, e);
            AppError::Db(e)
        })?;
    Ok(Json(predictions))
}
