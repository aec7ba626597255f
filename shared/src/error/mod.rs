//! Unified error system for the Workwize cache backend
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by range
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`] / [`ErrorBody`]: the `{data}` and `{error}` envelopes
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Upstream errors
//! - 2xxx: Rate limiting
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::NotFound);
//! let err = AppError::validation("limit must be between 1 and 500")
//!     .with_detail("field", "limit");
//! let body = err.to_body();
//! assert_eq!(body.error.code, 2);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, ErrorBody, ErrorPayload, mask_system_errors};
