//! Office rows

use shared::models::Office;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "offices";
const COLUMNS: &str =
    "id, name, code, address_id, contact_email, capacity, status, created_at, updated_at";

// ── Sync ──

pub async fn upsert(pool: &PgPool, row: &Office) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO offices (
            id, name, code, address_id, contact_email, capacity, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, (SELECT id FROM addresses WHERE id = $4), $5, $6, $7, $8, $9)
        ON CONFLICT (id)
        DO UPDATE SET
            name = EXCLUDED.name, code = EXCLUDED.code, address_id = EXCLUDED.address_id,
            contact_email = EXCLUDED.contact_email, capacity = EXCLUDED.capacity,
            status = EXCLUDED.status, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.name)
    .bind(&row.code)
    .bind(&row.address_id)
    .bind(&row.contact_email)
    .bind(row.capacity)
    .bind(&row.status)
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
) -> Result<(Vec<Office>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Office>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}
