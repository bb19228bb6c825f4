use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One raw price observation for a product in a city.
///
/// Several rows may share the same (product_id, city, date) — one per market
/// or listing reporting that day. They are averaged into a single daily value
/// before any feature computation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MarketPrice {
    pub id: Uuid,
    pub product_id: Uuid,
    pub city: String,
    pub date: NaiveDate,
    pub price: f64,
    pub market: Option<String>,
    pub created_at: DateTime<Utc>,
}
