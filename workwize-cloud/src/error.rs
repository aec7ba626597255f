//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and
//! client errors (`WorkwizeError`, `LlmError`) to the API-layer `AppError`,
//! so handlers can use `?` without per-call mapping.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::assistant::llm::LlmError;
use crate::workwize::WorkwizeError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error (logged, mapped to DatabaseError)
    Db(BoxError),
    /// Already classified error, passed through to the client
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<WorkwizeError> for ServiceError {
    fn from(e: WorkwizeError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<LlmError> for ServiceError {
    fn from(e: LlmError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::with_message(ErrorCode::DatabaseError, db_err.to_string())
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
