//! Shared types for the Workwize cache backend
//!
//! Error codes and envelopes, entity models, sync report types and
//! pagination types used by the server and its tests.

pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod sync;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, ErrorCode};
pub use sync::{SyncOutcome, SyncReport, SyncResource};
