//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub order_number: Option<String>,
    pub status: Option<String>,
    pub order_date: Option<String>,
    pub delivery_date: Option<String>,
    pub total_amount: Option<Decimal>,
    pub currency: Option<String>,
    /// Remote actor that placed the order
    pub customer_id: Option<String>,
    pub employee_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub notes: Option<String>,
    pub po_number: Option<String>,
    pub total_products: Option<i32>,
    /// Masked receiver name
    pub receiver: Option<String>,
    pub receiver_type: Option<String>,
    pub express_delivery: bool,
    /// Scrubbed shipping block (city/region/postal code/country)
    pub shipping_info: Option<serde_json::Value>,
    pub created_at: i64,
    pub updated_at: i64,
}
