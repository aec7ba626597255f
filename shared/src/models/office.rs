//! Office Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Office {
    pub id: String,
    pub name: Option<String>,
    pub code: Option<String>,
    pub address_id: Option<String>,
    /// Masked contact address
    pub contact_email: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
