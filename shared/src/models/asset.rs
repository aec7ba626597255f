//! Asset Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cached asset row.
///
/// At most one of `assigned_to_id`, `office_id`, `warehouse_id` is derived
/// from the remote location; `location` holds city/region only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Asset {
    pub id: String,
    pub asset_tag: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub serial_number: Option<String>,
    pub product_id: Option<String>,
    pub assigned_to_id: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub currency: Option<String>,
    pub warranty_expires: Option<String>,
    pub notes: Option<String>,
    pub office_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
