//! Offboarding rows and the offboard PATCH route's update

use shared::models::Offboard;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "offboards";
const COLUMNS: &str = "id, employee_id, offboard_date, reason, status, returned_assets, notes, \
     processed_by, created_at, updated_at";

// ── Sync ──

pub async fn upsert(pool: &PgPool, row: &Offboard) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO offboards (
            id, employee_id, offboard_date, reason, status, returned_assets,
            notes, processed_by, created_at, updated_at
        )
        VALUES ($1, (SELECT id FROM employees WHERE id = $2), $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id)
        DO UPDATE SET
            employee_id = EXCLUDED.employee_id, offboard_date = EXCLUDED.offboard_date,
            reason = EXCLUDED.reason, status = EXCLUDED.status,
            returned_assets = EXCLUDED.returned_assets, notes = EXCLUDED.notes,
            processed_by = EXCLUDED.processed_by, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.employee_id)
    .bind(&row.offboard_date)
    .bind(&row.reason)
    .bind(&row.status)
    .bind(row.returned_assets)
    .bind(&row.notes)
    .bind(&row.processed_by)
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
) -> Result<(Vec<Offboard>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Offboard>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}

/// Apply a local edit; `None` leaves the column unchanged.
pub async fn update(
    pool: &PgPool,
    id: &str,
    status: Option<&str>,
    returned_assets: Option<bool>,
    notes: Option<&str>,
    now: i64,
) -> Result<Option<Offboard>, BoxError> {
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE offboards
        SET status = COALESCE($2, status),
            returned_assets = COALESCE($3, returned_assets),
            notes = COALESCE($4, notes),
            updated_at = $5
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .bind(returned_assets)
    .bind(notes)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
