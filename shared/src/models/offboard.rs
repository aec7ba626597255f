//! Offboard Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Offboard {
    pub id: String,
    pub employee_id: Option<String>,
    pub offboard_date: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    /// True once every asset of the employee has come back
    pub returned_assets: bool,
    pub notes: Option<String>,
    pub processed_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
