//! Manual sync triggers

use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::{ApiResponse, SyncOutcome, SyncReport, SyncResource};

use crate::state::AppState;

use super::ApiResult;

/// POST /api/sync/all
pub async fn sync_all(State(state): State<AppState>) -> ApiResult<SyncReport> {
    let report = state.sync.run_all().await;
    Ok(ApiResponse::success(report))
}

/// POST /api/sync/{resource}
///
/// A fetch failure for the one requested type is a 502; per-record
/// failures are reported in the outcome.
pub async fn sync_resource(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> ApiResult<SyncOutcome> {
    let parsed = resource.parse::<SyncResource>().map_err(|e| {
        AppError::invalid_request(e.to_string()).with_detail("resource", resource.clone())
    })?;

    let outcome = state.sync.run_one(parsed).await;
    if let Some(err) = fetch_failure(&outcome) {
        return Err(err.into());
    }
    Ok(ApiResponse::success(outcome))
}

/// The 502 for an outcome where nothing could be pulled at all.
///
/// A provider response is attached as `status`/`body` details.
fn fetch_failure(outcome: &SyncOutcome) -> Option<AppError> {
    if outcome.succeeded != 0 || outcome.failed != 0 {
        return None;
    }
    let message = outcome.error_message.as_deref()?;
    let resource = outcome.resource;
    let err = AppError::with_message(
        ErrorCode::UpstreamError,
        format!("Sync of {resource} failed: {message}"),
    )
    .with_detail("resource", resource.as_str());
    Some(match &outcome.upstream {
        Some(upstream) => err
            .with_detail("status", upstream.status)
            .with_detail("body", upstream.body.clone()),
        None => err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_fetch_failure_only_without_records() {
        let failed = SyncOutcome::fetch_failed(SyncResource::Assets, "request timed out");
        let err = fetch_failure(&failed).unwrap();
        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert_eq!(err.message, "Sync of assets failed: request timed out");

        let mut partial = SyncOutcome::new(SyncResource::Assets);
        partial.record_success();
        partial.record_failure("record has no id");
        assert!(fetch_failure(&partial).is_none());

        assert!(fetch_failure(&SyncOutcome::new(SyncResource::Orders)).is_none());
    }

    #[test]
    fn test_upstream_status_and_body_in_details() {
        let failed = SyncOutcome::fetch_failed(SyncResource::Orders, "HTTP 503: maintenance")
            .with_upstream(503, "maintenance");
        let err = fetch_failure(&failed).unwrap();
        assert_eq!(err.http_status(), http::StatusCode::BAD_GATEWAY);

        let details = err.details.unwrap();
        assert_eq!(details["resource"], json!("orders"));
        assert_eq!(details["status"], json!(503));
        assert_eq!(details["body"], json!("maintenance"));

        let timed_out = SyncOutcome::fetch_failed(SyncResource::Orders, "request timed out");
        let details = fetch_failure(&timed_out).unwrap().details.unwrap();
        assert!(!details.contains_key("status"));
    }
}
