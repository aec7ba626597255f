//! Sync pass types
//!
//! Shared between the orchestrator, the `/api/sync` routes and `/api/status`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource types pulled from the Workwize API.
///
/// [`SyncResource::ALL`] lists them in dependency order: rows referenced by
/// foreign keys are synced before the rows that reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncResource {
    Warehouses,
    Offices,
    Employees,
    Addresses,
    Products,
    Assets,
    Orders,
    Offboards,
}

impl SyncResource {
    pub const ALL: [SyncResource; 8] = [
        SyncResource::Warehouses,
        SyncResource::Offices,
        SyncResource::Employees,
        SyncResource::Addresses,
        SyncResource::Products,
        SyncResource::Assets,
        SyncResource::Orders,
        SyncResource::Offboards,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncResource::Warehouses => "warehouses",
            SyncResource::Offices => "offices",
            SyncResource::Employees => "employees",
            SyncResource::Addresses => "addresses",
            SyncResource::Products => "products",
            SyncResource::Assets => "assets",
            SyncResource::Orders => "orders",
            SyncResource::Offboards => "offboards",
        }
    }
}

impl fmt::Display for SyncResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown resource name in a sync request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sync resource: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for SyncResource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncResource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

/// Result of syncing one resource type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub resource: SyncResource,
    pub succeeded: u32,
    pub failed: u32,
    /// First error seen, or the fetch error when nothing could be pulled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Provider response behind a failed fetch; surfaced as error details only
    #[serde(skip)]
    pub upstream: Option<UpstreamFailure>,
}

/// Status and (already truncated) body of a non-success provider response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    pub status: u16,
    pub body: String,
}

impl SyncOutcome {
    pub fn new(resource: SyncResource) -> Self {
        Self {
            resource,
            succeeded: 0,
            failed: 0,
            error_message: None,
            upstream: None,
        }
    }

    /// Outcome for a resource whose fetch failed before any record was seen
    pub fn fetch_failed(resource: SyncResource, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::new(resource)
        }
    }

    /// Attach the provider response that caused a fetch failure
    pub fn with_upstream(mut self, status: u16, body: impl Into<String>) -> Self {
        self.upstream = Some(UpstreamFailure {
            status,
            body: body.into(),
        });
        self
    }

    /// Count a failed record, keeping the first error message
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.failed += 1;
        if self.error_message.is_none() {
            self.error_message = Some(message.into());
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }
}

/// Aggregate of one sync pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
    /// Unix millis
    pub started_at: i64,
    /// Unix millis
    pub finished_at: i64,
}

impl SyncReport {
    pub fn total_succeeded(&self) -> u32 {
        self.outcomes.iter().map(|o| o.succeeded).sum()
    }

    pub fn total_failed(&self) -> u32 {
        self.outcomes.iter().map(|o| o.failed).sum()
    }
}

/// Persisted history row, one per resource per sync pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SyncRun {
    pub id: i64,
    pub resource: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub succeeded: i32,
    pub failed: i32,
    pub error_message: Option<String>,
}
