//! API response payloads

use crate::request::PageRequest;
use serde::{Deserialize, Serialize};

/// One page of a list route: `{items, total, offset, limit}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Row count matching the filters, ignoring the window
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, window: PageRequest) -> Self {
        Self {
            items,
            total,
            offset: window.offset,
            limit: window.limit,
        }
    }
}
