//! Country reference data, keyed by ISO code

use shared::models::Country;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "countries";
const COLUMNS: &str =
    "id, name, code, requires_tin, invoice_currency, is_offboardable, created_at, updated_at";

pub async fn upsert(pool: &PgPool, row: &Country) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO countries (
            id, name, code, requires_tin, invoice_currency, is_offboardable, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (code)
        DO UPDATE SET
            name = EXCLUDED.name, requires_tin = EXCLUDED.requires_tin,
            invoice_currency = EXCLUDED.invoice_currency,
            is_offboardable = EXCLUDED.is_offboardable,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.name)
    .bind(&row.code)
    .bind(row.requires_tin)
    .bind(&row.invoice_currency)
    .bind(row.is_offboardable)
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
) -> Result<(Vec<Country>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}
