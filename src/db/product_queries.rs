use sqlx::PgPool;

use crate::models::Product;

/// Resolve a product by its display name.
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, category, created_at
        FROM products
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, category, created_at
        FROM products
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Insert a product if it does not exist yet, returning the stored row.
pub async fn upsert_by_name(
    pool: &PgPool,
    name: &str,
    category: Option<&str>,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (id, name, category)
        VALUES (gen_random_uuid(), $1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name, category, created_at
        "#,
    )
    .bind(name)
    .bind(category)
    .fetch_one(pool)
    .await
}
