//! Address rows (city/region/country granularity only)

use shared::models::Address;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "addresses";
const COLUMNS: &str =
    "id, employee_id, city, region, country, postal_code, latitude, longitude, created_at, updated_at";

// ── Sync ──

pub async fn upsert(pool: &PgPool, row: &Address) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO addresses (
            id, employee_id, city, region, country, postal_code,
            latitude, longitude, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id)
        DO UPDATE SET
            employee_id = COALESCE(EXCLUDED.employee_id, addresses.employee_id),
            city = EXCLUDED.city, region = EXCLUDED.region,
            country = EXCLUDED.country, postal_code = EXCLUDED.postal_code,
            latitude = EXCLUDED.latitude, longitude = EXCLUDED.longitude,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.employee_id)
    .bind(&row.city)
    .bind(&row.region)
    .bind(&row.country)
    .bind(&row.postal_code)
    .bind(row.latitude)
    .bind(row.longitude)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

// ── Console Read ──

pub async fn list(
    pool: &PgPool,
    filters: &[Filter],
    page: PageRequest,
) -> Result<(Vec<Address>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Address>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}
