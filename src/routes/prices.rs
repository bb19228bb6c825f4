use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::DailyPrice;
use crate::services::history_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:product/:city", get(get_daily_prices))
        .route("/:product/:city/mock", post(generate_mock_prices))
}

/// The grouped daily series the dashboard charts are drawn from.
pub async fn get_daily_prices(
    Path((product, city)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyPrice>>, AppError> {
    info!("GET /prices/{}/{} - Getting daily price series", product, city);
    let (_, series) = history_service::get_daily_series(&state.pool, &product, &city, None)
        .await
        .map_err(|e| {
            error!("Failed to get daily series for {} in {}: {}", product, city, e);
            e
        })?;
    Ok(Json(series.entries().to_vec()))
}

pub async fn generate_mock_prices(
    Path((product, city)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    info!("POST /prices/{}/{}/mock - Generating mock prices", product, city);
    history_service::generate_mock(&state.pool, &product, &city)
        .await
        .map_err(|e| {
            error!("Failed to generate mock prices for {} in {}: {}", product, city, e);
            e
        })?;
    Ok(StatusCode::CREATED)
}
