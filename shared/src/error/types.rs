//! Error types and API response envelopes

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// When set, system error messages are replaced by the generic code message
/// before they reach a client.
static MASK_SYSTEM_ERRORS: AtomicBool = AtomicBool::new(false);

/// Enable or disable masking of system error messages in responses.
///
/// Called once at startup with `environment == "production"`.
pub fn mask_system_errors(enabled: bool) {
    MASK_SYSTEM_ERRORS.store(enabled, Ordering::Relaxed);
}

/// Application error with structured error code and details
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (resource, path, upstream status, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create the fallback error for an unmatched route
    pub fn route_not_found(method: &str, path: &str) -> Self {
        Self::with_message(
            ErrorCode::RouteNotFound,
            format!("Route not found: {method} {path}"),
        )
        .with_detail("path", path)
    }

    /// Create an upstream error carrying the provider's status and body
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::with_message(
            ErrorCode::UpstreamError,
            format!("Upstream API returned HTTP {status}"),
        )
        .with_detail("status", status)
        .with_detail("body", body.into())
    }

    /// Create a rate limit error
    pub fn too_many_requests() -> Self {
        Self::new(ErrorCode::TooManyRequests)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// The body a client receives for this error.
    ///
    /// System errors lose their message and details while masking is on.
    pub fn to_body(&self) -> ErrorBody {
        let masked = MASK_SYSTEM_ERRORS.load(Ordering::Relaxed)
            && self.code.category() == ErrorCategory::System;
        let (message, details) = if masked {
            (self.code.message().to_string(), None)
        } else {
            (self.message.clone(), self.details.clone())
        };
        ErrorBody {
            error: ErrorPayload {
                code: self.code.code(),
                message,
                details,
            },
        }
    }
}

/// Success envelope: `{"data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

/// Failure envelope: `{"error": {"code", "message", "details"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        if self.code.category() == ErrorCategory::System {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(self.to_body())).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}
