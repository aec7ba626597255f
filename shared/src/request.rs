//! Request types shared by the list routes

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Default page size for list routes
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page size a client may request
pub const MAX_LIMIT: i64 = 500;

/// Validated offset/limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a window from optional query values, rejecting out-of-range input.
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Result<Self, AppError> {
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if offset < 0 {
            return Err(AppError::validation("offset must be >= 0").with_detail("field", "offset"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(
                AppError::validation(format!("limit must be between 1 and {MAX_LIMIT}"))
                    .with_detail("field", "limit"),
            );
        }
        Ok(Self { offset, limit })
    }
}
