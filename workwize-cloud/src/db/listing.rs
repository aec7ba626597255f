//! Filtered, paginated reads shared by the list routes
//!
//! Table and column names are `'static` strings from each entity module's
//! whitelist; only filter values are bound.

use shared::request::PageRequest;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::BoxError;

/// A bound filter value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
}

/// Exact-match filter on a whitelisted column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: FilterValue,
}

impl Filter {
    pub fn text(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn bool(column: &'static str, value: bool) -> Self {
        Self {
            column,
            value: FilterValue::Bool(value),
        }
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(filter.column);
        qb.push(" = ");
        match &filter.value {
            FilterValue::Text(s) => {
                qb.push_bind(s.clone());
            }
            FilterValue::Bool(b) => {
                qb.push_bind(*b);
            }
        }
    }
}

/// One window of `table` ordered by id, plus the filtered total.
pub async fn fetch_page<T>(
    pool: &PgPool,
    table: &'static str,
    columns: &'static str,
    filters: &[Filter],
    page: PageRequest,
) -> Result<(Vec<T>, i64), BoxError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_where(&mut count, filters);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut rows = QueryBuilder::new(format!("SELECT {columns} FROM {table}"));
    push_where(&mut rows, filters);
    rows.push(" ORDER BY id LIMIT ");
    rows.push_bind(page.limit);
    rows.push(" OFFSET ");
    rows.push_bind(page.offset);
    let items: Vec<T> = rows.build_query_as().fetch_all(pool).await?;

    Ok((items, total))
}

/// One row of `table` by id.
pub async fn fetch_one<T>(
    pool: &PgPool,
    table: &'static str,
    columns: &'static str,
    id: &str,
) -> Result<Option<T>, BoxError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let row = sqlx::query_as(&format!("SELECT {columns} FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
