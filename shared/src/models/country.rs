//! Country Model

use serde::{Deserialize, Serialize};

/// Country reference data, derived from employee addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Country {
    pub id: String,
    pub name: String,
    /// ISO code, unique
    pub code: String,
    pub requires_tin: bool,
    pub invoice_currency: Option<String>,
    pub is_offboardable: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
