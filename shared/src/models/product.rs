//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalogue product. Carries no PII.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    /// Plain text, HTML stripped
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub stock_quantity: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}
