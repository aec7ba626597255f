//! Product catalog rows

use shared::models::Product;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "products";
const COLUMNS: &str = "id, name, sku, category, description, manufacturer, model, price, currency, \
     status, stock_quantity, created_at, updated_at";

pub async fn upsert(pool: &PgPool, row: &Product) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO products (
            id, name, sku, category, description, manufacturer, model,
            price, currency, status, stock_quantity, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (id)
        DO UPDATE SET
            name = EXCLUDED.name, sku = EXCLUDED.sku, category = EXCLUDED.category,
            description = EXCLUDED.description, manufacturer = EXCLUDED.manufacturer,
            model = EXCLUDED.model, price = EXCLUDED.price, currency = EXCLUDED.currency,
            status = EXCLUDED.status, stock_quantity = EXCLUDED.stock_quantity,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.name)
    .bind(&row.sku)
    .bind(&row.category)
    .bind(&row.description)
    .bind(&row.manufacturer)
    .bind(&row.model)
    .bind(row.price)
    .bind(&row.currency)
    .bind(&row.status)
    .bind(row.stock_quantity)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(
    pool: &PgPool,
    filters: &[Filter],
    page: PageRequest,
) -> Result<(Vec<Product>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Product>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}
