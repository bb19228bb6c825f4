use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::db;
use crate::errors::AppError;
use crate::models::Product;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_products))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    info!("GET /products - Listing products");
    let products = db::product_queries::fetch_all(&state.pool).await.map_err(|e| {
        error!("Failed to list products: {}", e);
        AppError::Db(e)
    })?;
    Ok(Json(products))
}
