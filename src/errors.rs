use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use sqlx::Error;
use thiserror::Error;

/// Minimum number of distinct observation dates a series must carry before
/// the lag/rolling features are meaningful.
pub const MIN_HISTORY_DAYS: usize = 14;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Insufficient history: need at least {required} distinct dates, got {got}")]
    InsufficientHistory { required: usize, got: usize },
    #[error("Feature schema mismatch: scorer expects width {expected}, built {got}")]
    SchemaMismatch { expected: usize, got: usize },
    #[error("Scorer failure: {0}")]
    Scorer(String),
    #[error("Forecast cancelled")]
    Cancelled,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientHistory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SchemaMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Scorer(_) => StatusCode::BAD_GATEWAY,
            AppError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            AppError::Db(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: Error) -> Self {
        AppError::Db(value)
    }
}
