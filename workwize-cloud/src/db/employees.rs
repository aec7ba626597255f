//! Employee rows (names and emails arrive masked)

use shared::models::Employee;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "employees";
const COLUMNS: &str = "id, first_name, last_name, email, department, role, status, job_title, \
     manager_id, office_id, address_id, start_date, end_date, created_at, updated_at";

// ── Sync ──

pub async fn upsert(pool: &PgPool, row: &Employee) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO employees (
            id, first_name, last_name, email, department, role, status, job_title,
            manager_id, office_id, address_id, start_date, end_date, created_at, updated_at
        )
        VALUES (
            $1, $2, NULL, $3, $4, $5, $6, $7,
            (SELECT id FROM employees WHERE id = $8),
            (SELECT id FROM offices WHERE id = $9),
            (SELECT id FROM addresses WHERE id = $10),
            $11, $12, $13, $14
        )
        ON CONFLICT (id)
        DO UPDATE SET
            first_name = EXCLUDED.first_name, last_name = NULL, email = EXCLUDED.email,
            department = EXCLUDED.department, role = EXCLUDED.role, status = EXCLUDED.status,
            job_title = EXCLUDED.job_title,
            manager_id = COALESCE(EXCLUDED.manager_id, employees.manager_id),
            office_id = EXCLUDED.office_id,
            address_id = COALESCE(EXCLUDED.address_id, employees.address_id),
            start_date = EXCLUDED.start_date, end_date = EXCLUDED.end_date,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.first_name)
    .bind(&row.email)
    .bind(&row.department)
    .bind(&row.role)
    .bind(&row.status)
    .bind(&row.job_title)
    .bind(&row.manager_id)
    .bind(&row.office_id)
    .bind(&row.address_id)
    .bind(&row.start_date)
    .bind(&row.end_date)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Second pass: point an employee at a manager stored in the same run.
pub async fn link_manager(pool: &PgPool, employee_id: &str, manager_id: &str) -> Result<(), BoxError> {
    sqlx::query(
        "UPDATE employees SET manager_id = (SELECT id FROM employees WHERE id = $2) WHERE id = $1",
    )
    .bind(employee_id)
    .bind(manager_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn link_address(pool: &PgPool, employee_id: &str, address_id: &str) -> Result<(), BoxError> {
    sqlx::query(
        "UPDATE employees SET address_id = (SELECT id FROM addresses WHERE id = $2) WHERE id = $1",
    )
    .bind(employee_id)
    .bind(address_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn ids(pool: &PgPool) -> Result<Vec<String>, BoxError> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM employees ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

// ── Console Read ──

pub async fn list(
    pool: &PgPool,
    filters: &[Filter],
    page: PageRequest,
) -> Result<(Vec<Employee>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Employee>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}
