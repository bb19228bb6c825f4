use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::models::MarketPrice;

/// Fetch every raw price observation for a (product, city) pair, ascending
/// by date. Rows are per-market listings; same-date rows are averaged by the
/// history service before feature work.
pub async fn fetch_for_product_city(
    pool: &PgPool,
    product_id: Uuid,
    city: &str,
) -> Result<Vec<MarketPrice>, sqlx::Error> {
    sqlx::query_as::<_, MarketPrice>(
        r#"
        SELECT id, product_id, city, date, price, market, created_at
        FROM market_prices
        WHERE product_id = $1 AND city = $2
        ORDER BY date ASC
        "#,
    )
    .bind(product_id)
    .bind(city)
    .fetch_all(pool)
    .await
}

/// Insert a batch of observations in one transaction.
pub async fn insert_many(
    pool: &PgPool,
    points: &[(Uuid, String, NaiveDate, f64)],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin transaction for market price insert: {}", e);
        e
    })?;

    for (product_id, city, date, price) in points {
        sqlx::query(
            r#"
            INSERT INTO market_prices (id, product_id, city, date, price)
            VALUES (gen_random_uuid(), $1, $2, $3, $4)
            "#,
        )
        .bind(product_id)
        .bind(city)
        .bind(date)
        .bind(price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}
