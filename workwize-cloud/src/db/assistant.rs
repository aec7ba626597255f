//! Asset search backing the chat assistant
//!
//! Country comes from the address of whoever holds the asset: the assigned
//! employee, else the warehouse, else the office.

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::BoxError;
use crate::assistant::intent::AssetFilters;

const FROM: &str = r#"
    FROM assets a
    LEFT JOIN products p ON p.id = a.product_id
    LEFT JOIN warehouses w ON w.id = a.warehouse_id
    LEFT JOIN addresses wa ON wa.id = w.address_id
    LEFT JOIN employees e ON e.id = a.assigned_to_id
    LEFT JOIN addresses ea ON ea.id = e.address_id
    LEFT JOIN offices o ON o.id = a.office_id
    LEFT JOIN addresses oa ON oa.id = o.address_id
"#;

const COUNTRY: &str = "COALESCE(ea.country, wa.country, oa.country)";

/// Asset row handed to the model; carries no personal data.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AssetSample {
    pub id: String,
    pub asset_tag: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub manufacturer: Option<String>,
    pub warehouse: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct AssetSearch {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
    pub samples: Vec<AssetSample>,
}

fn filtered(select: &str, filters: &AssetFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("{select} {FROM} WHERE TRUE"));

    if let Some(country) = &filters.country {
        qb.push(format!(" AND LOWER({COUNTRY}) = LOWER("));
        qb.push_bind(country.clone());
        qb.push(")");
    }
    if let Some(manufacturer) = &filters.manufacturer {
        qb.push(" AND (p.manufacturer ILIKE ");
        qb.push_bind(manufacturer.clone());
        qb.push(" OR p.name ILIKE ");
        qb.push_bind(format!("{manufacturer}%"));
        qb.push(")");
    }
    if let Some(device) = filters.device_class {
        qb.push(" AND (FALSE");
        for pattern in device.patterns() {
            for column in ["a.name", "a.category", "p.name", "p.category"] {
                qb.push(format!(" OR {column} ILIKE "));
                qb.push_bind(pattern.to_string());
            }
        }
        qb.push(")");
    }
    if filters.warehouse_only {
        qb.push(" AND a.warehouse_id IS NOT NULL AND a.assigned_to_id IS NULL");
    } else if filters.assigned_only {
        qb.push(" AND a.assigned_to_id IS NOT NULL");
    }
    qb
}

pub async fn search_assets(
    pool: &PgPool,
    filters: &AssetFilters,
    limit: i64,
) -> Result<AssetSearch, BoxError> {
    let total: i64 = filtered("SELECT COUNT(*)", filters)
        .build_query_scalar()
        .fetch_one(pool)
        .await?;

    let mut breakdown = filtered(
        "SELECT COALESCE(a.status, 'unknown') AS status, COUNT(*) AS count",
        filters,
    );
    breakdown.push(" GROUP BY 1 ORDER BY 2 DESC, 1");
    let by_status: Vec<StatusCount> = breakdown.build_query_as().fetch_all(pool).await?;

    let mut samples = filtered(
        &format!(
            "SELECT a.id, a.asset_tag, a.name, a.category, a.status, a.location, \
             {COUNTRY} AS country, p.manufacturer, w.name AS warehouse"
        ),
        filters,
    );
    samples.push(" ORDER BY a.id LIMIT ");
    samples.push_bind(limit);
    let samples: Vec<AssetSample> = samples.build_query_as().fetch_all(pool).await?;

    Ok(AssetSearch {
        total,
        by_status,
        samples,
    })
}
