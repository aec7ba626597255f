//! Employee Model

use serde::{Deserialize, Serialize};

/// Cached employee row.
///
/// `first_name` and `email` hold masked values only; `last_name` is always
/// `None` once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub job_title: Option<String>,
    /// Manager reference (employee id)
    pub manager_id: Option<String>,
    pub office_id: Option<String>,
    pub address_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
