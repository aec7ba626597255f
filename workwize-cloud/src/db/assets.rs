//! Asset rows and the asset PATCH route's update

use shared::models::Asset;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "assets";
const COLUMNS: &str = "id, asset_tag, name, category, status, serial_number, product_id, \
     assigned_to_id, location, purchase_date, purchase_price, currency, warranty_expires, notes, \
     office_id, warehouse_id, created_at, updated_at";

// ── Sync ──

pub async fn upsert(pool: &PgPool, row: &Asset) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO assets (
            id, asset_tag, name, category, status, serial_number, product_id, assigned_to_id,
            location, purchase_date, purchase_price, currency, warranty_expires, notes,
            office_id, warehouse_id, created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4, $5, $6,
            (SELECT id FROM products WHERE id = $7),
            (SELECT id FROM employees WHERE id = $8),
            $9, $10, $11, $12, $13, $14,
            (SELECT id FROM offices WHERE id = $15),
            (SELECT id FROM warehouses WHERE id = $16),
            $17, $18
        )
        ON CONFLICT (id)
        DO UPDATE SET
            asset_tag = EXCLUDED.asset_tag, name = EXCLUDED.name, category = EXCLUDED.category,
            status = EXCLUDED.status, serial_number = EXCLUDED.serial_number,
            product_id = EXCLUDED.product_id, assigned_to_id = EXCLUDED.assigned_to_id,
            location = EXCLUDED.location, purchase_date = EXCLUDED.purchase_date,
            purchase_price = EXCLUDED.purchase_price, currency = EXCLUDED.currency,
            warranty_expires = EXCLUDED.warranty_expires, notes = EXCLUDED.notes,
            office_id = EXCLUDED.office_id, warehouse_id = EXCLUDED.warehouse_id,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.asset_tag)
    .bind(&row.name)
    .bind(&row.category)
    .bind(&row.status)
    .bind(&row.serial_number)
    .bind(&row.product_id)
    .bind(&row.assigned_to_id)
    .bind(&row.location)
    .bind(&row.purchase_date)
    .bind(row.purchase_price)
    .bind(&row.currency)
    .bind(&row.warranty_expires)
    .bind(&row.notes)
    .bind(&row.office_id)
    .bind(&row.warehouse_id)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

// ── Console ──

pub async fn list(
    pool: &PgPool,
    filters: &[Filter],
    page: PageRequest,
) -> Result<(Vec<Asset>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Asset>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}

/// Apply a local edit; `None` leaves the column unchanged.
pub async fn update(
    pool: &PgPool,
    id: &str,
    status: Option<&str>,
    notes: Option<&str>,
    now: i64,
) -> Result<Option<Asset>, BoxError> {
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE assets
        SET status = COALESCE($2, status), notes = COALESCE($3, notes), updated_at = $4
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .bind(notes)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
