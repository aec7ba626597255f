//! Cache status endpoint

use axum::extract::State;
use serde::Serialize;
use shared::ApiResponse;
use shared::sync::SyncRun;

use crate::db::status::TableCount;
use crate::db::{status, sync_runs};
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// `"ok"` or `"unreachable"`
    pub database: &'static str,
    pub environment: String,
    pub tables: Vec<TableCount>,
    /// Latest run per resource
    pub last_sync: Vec<SyncRun>,
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusReport> {
    let environment = state.config.environment.clone();

    if let Err(e) = status::ping(&state.pool).await {
        tracing::warn!(error = %e, "Database unreachable");
        return Ok(ApiResponse::success(StatusReport {
            database: "unreachable",
            environment,
            tables: Vec::new(),
            last_sync: Vec::new(),
        }));
    }

    let tables = status::table_counts(&state.pool).await?;
    let last_sync = sync_runs::latest_per_resource(&state.pool).await?;

    Ok(ApiResponse::success(StatusReport {
        database: "ok",
        environment,
        tables,
        last_sync,
    }))
}
