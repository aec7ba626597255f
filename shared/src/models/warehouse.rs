//! Warehouse Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Warehouse {
    pub id: String,
    pub name: Option<String>,
    /// Short site code (e.g. `LDW`)
    pub code: Option<String>,
    pub address_id: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
    pub warehouse_type: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
