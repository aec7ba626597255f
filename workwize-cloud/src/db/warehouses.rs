//! Warehouse rows

use shared::models::Warehouse;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "warehouses";
const COLUMNS: &str =
    "id, name, code, address_id, capacity, status, warehouse_type, created_at, updated_at";

// ── Sync ──

pub async fn upsert(pool: &PgPool, row: &Warehouse) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO warehouses (
            id, name, code, address_id, capacity, status, warehouse_type, created_at, updated_at
        )
        VALUES ($1, $2, $3, (SELECT id FROM addresses WHERE id = $4), $5, $6, $7, $8, $9)
        ON CONFLICT (id)
        DO UPDATE SET
            name = EXCLUDED.name, code = EXCLUDED.code,
            address_id = COALESCE(EXCLUDED.address_id, warehouses.address_id),
            capacity = EXCLUDED.capacity, status = EXCLUDED.status,
            warehouse_type = EXCLUDED.warehouse_type, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.name)
    .bind(&row.code)
    .bind(&row.address_id)
    .bind(row.capacity)
    .bind(&row.status)
    .bind(&row.warehouse_type)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn link_address(pool: &PgPool, warehouse_id: &str, address_id: &str) -> Result<(), BoxError> {
    sqlx::query(
        "UPDATE warehouses SET address_id = (SELECT id FROM addresses WHERE id = $2) WHERE id = $1",
    )
    .bind(warehouse_id)
    .bind(address_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn without_address(pool: &PgPool) -> Result<Vec<(String, Option<String>)>, BoxError> {
    let rows: Vec<(String, Option<String>)> =
        sqlx::query_as("SELECT id, code FROM warehouses WHERE address_id IS NULL ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

// ── Console Read ──

pub async fn list(
    pool: &PgPool,
    filters: &[Filter],
    page: PageRequest,
) -> Result<(Vec<Warehouse>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Warehouse>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}
