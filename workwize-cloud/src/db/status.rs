//! Cache health for `/api/status`

use serde::Serialize;
use sqlx::PgPool;

use super::{BoxError, addresses, assets, countries, employees, offboards, offices, orders, products, warehouses};

const COUNTED_TABLES: [&str; 9] = [
    warehouses::TABLE,
    offices::TABLE,
    employees::TABLE,
    addresses::TABLE,
    countries::TABLE,
    products::TABLE,
    assets::TABLE,
    orders::TABLE,
    offboards::TABLE,
];

#[derive(Debug, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

pub async fn ping(pool: &PgPool) -> Result<(), BoxError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn table_counts(pool: &PgPool) -> Result<Vec<TableCount>, BoxError> {
    let mut counts = Vec::with_capacity(COUNTED_TABLES.len());
    for table in COUNTED_TABLES {
        let rows: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await?;
        counts.push(TableCount { table, rows });
    }
    Ok(counts)
}
