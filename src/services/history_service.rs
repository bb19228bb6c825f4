use chrono::{Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::db;
use crate::errors::{AppError, MIN_HISTORY_DAYS};
use crate::models::{DailySeries, Product};

/// Load and normalize the price history for a (product, city) pair.
///
/// Same-date listings are averaged into one daily value before anything else
/// looks at the series; raw per-market rows never reach the feature builder.
pub async fn get_daily_series(
    pool: &PgPool,
    product_name: &str,
    city: &str,
    lookback_days: Option<i64>,
) -> Result<(Product, DailySeries), AppError> {
    let product = db::product_queries::find_by_name(pool, product_name)
        .await
        .map_err(|e| {
            error!("Failed to resolve product {}: {}", product_name, e);
            AppError::Db(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", product_name)))?;

    let rows = db::market_price_queries::fetch_for_product_city(pool, product.id, city)
        .await
        .map_err(|e| {
            error!(
                "Failed to fetch price history for {} in {}: {}",
                product_name, city, e
            );
            AppError::Db(e)
        })?;

    if rows.is_empty() {
        return Err(AppError::NotFound(format!(
            "No historical data found for {} in {}",
            product_name, city
        )));
    }

    let mut series = DailySeries::from_observations(rows.iter().map(|r| (r.date, r.price)));

    if let Some(lookback) = lookback_days {
        if lookback < 1 {
            return Err(AppError::Validation(
                "lookback_days must be positive".to_string(),
            ));
        }
        series.restrict_to_lookback(lookback);
    }

    if series.len() < MIN_HISTORY_DAYS {
        return Err(AppError::InsufficientHistory {
            required: MIN_HISTORY_DAYS,
            got: series.len(),
        });
    }

    info!(
        "Loaded {} days of history for {} in {} ({} raw observations)",
        series.len(),
        product_name,
        city,
        rows.len()
    );

    Ok((product, series))
}

/// Seed ~60 days of synthetic observations for a (product, city) pair, two
/// listings per day, for development and integration testing.
pub async fn generate_mock(
    pool: &PgPool,
    product_name: &str,
    city: &str,
) -> Result<(), AppError> {
    let product = db::product_queries::upsert_by_name(pool, product_name, None)
        .await
        .map_err(|e| {
            error!("Failed to upsert product {}: {}", product_name, e);
            AppError::Db(e)
        })?;

    let today = Utc::now().date_naive();
    let mut points: Vec<(Uuid, String, chrono::NaiveDate, f64)> = Vec::new();
    let mut current = 10.0_f64;

    for i in 0..60 {
        current *= 1.0 + (rand::random::<f64>() - 0.5) * 0.04;
        let date = today - ChronoDuration::days(59 - i);

        // Two markets reporting slightly different prices the same day.
        points.push((product.id, city.to_string(), date, current));
        points.push((
            product.id,
            city.to_string(),
            date,
            current * (1.0 + (rand::random::<f64>() - 0.5) * 0.02),
        ));
    }

    db::market_price_queries::insert_many(pool, &points)
        .await
        .map_err(|e| {
            error!(
                "Failed to insert mock prices for {} in {}: {}",
                product_name, city, e
            );
            AppError::Db(e)
        })?;

    info!("Seeded mock history for {} in {}", product_name, city);
    Ok(())
}
