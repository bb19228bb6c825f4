use sqlx::PgPool;
use tracing::error;

use crate::models::PricePrediction;

/// Write one row per forecasted day inside a transaction.
///
/// Re-running a forecast for an already-forecast (product, city, date,
/// model_version) key overwrites the previous row instead of appending a
/// duplicate.
pub async fn upsert_predictions(
    pool: &PgPool,
    rows: &[PricePrediction],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin transaction for prediction upsert: {}", e);
        e
    })?;

    for row in rows {
        if let Err(e) = sqlx::query(
            r#"
            INSERT INTO price_predictions
                (id, product_id, product_name, city, predict_date, predicted_price, model_version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (product_id, city, predict_date, model_version)
            DO UPDATE SET predicted_price = EXCLUDED.predicted_price,
                          created_at = EXCLUDED.created_at
            "#,
        )
        .bind(row.id)
        .bind(row.product_id)
        .bind(&row.product_name)
        .bind(&row.city)
        .bind(row.predict_date)
        .bind(row.predicted_price)
        .bind(&row.model_version)
        .bind(row.created_at)
        .execute(&mut *tx)
        .await
        {
            error!(
                "Failed to upsert prediction for {} {} on {}: {}",
                row.product_name, row.city, row.predict_date, e
            );
            return Err(e);
        }
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit prediction upsert: {}", e);
        e
    })
}

/// Stored predictions for a (product, city) pair, newest forecast date first.
pub async fn fetch_for_product_city(
    pool: &PgPool,
    product_name: &str,
    city: &str,
) -> Result<Vec<PricePrediction>, sqlx::Error> {
    sqlx::query_as::<_, PricePrediction>(
        r#"
        SELECT id, product_id, product_name, city, predict_date, predicted_price, model_version, created_at
        FROM price_predictions
        WHERE product_name = $1 AND city = $2
        ORDER BY predict_date DESC, created_at DESC
        "#,
    )
    .bind(product_name)
    .bind(city)
    .fetch_all(pool)
    .await
}
