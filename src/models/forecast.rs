use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Single forecasted day. `price` is non-negative and rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Complete forecast for one (product, city) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceForecast {
    pub success: bool,
    pub product: String,
    pub city: String,
    pub predictions: Vec<ForecastPoint>,
    pub model_version: String,
    /// False when the forecast was computed but could not be written back.
    pub persisted: bool,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Persisted prediction row, one per forecasted day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricePrediction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub city: String,
    pub predict_date: NaiveDate,
    pub predicted_price: f64,
    pub model_version: String,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /api/predictions/forecast.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    pub product: String,
    pub city: String,
    #[serde(default = "default_days")]
    pub days: u32,
    /// Optional restriction of the history read to the last N days.
    pub lookback_days: Option<i64>,
}

fn default_days() -> u32 {
    3
}
