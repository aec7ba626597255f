//! Sync run history

use shared::SyncOutcome;
use shared::sync::SyncRun;
use sqlx::PgPool;

use super::BoxError;

pub async fn insert(
    pool: &PgPool,
    outcome: &SyncOutcome,
    started_at: i64,
    finished_at: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO sync_runs (resource, started_at, finished_at, succeeded, failed, error_message)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(outcome.resource.as_str())
    .bind(started_at)
    .bind(finished_at)
    .bind(i32::try_from(outcome.succeeded).unwrap_or(i32::MAX))
    .bind(i32::try_from(outcome.failed).unwrap_or(i32::MAX))
    .bind(&outcome.error_message)
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recent run of each resource
pub async fn latest_per_resource(pool: &PgPool) -> Result<Vec<SyncRun>, BoxError> {
    let rows: Vec<SyncRun> = sqlx::query_as(
        r#"
        SELECT DISTINCT ON (resource)
            id, resource, started_at, finished_at, succeeded, failed, error_message
        FROM sync_runs
        ORDER BY resource, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
