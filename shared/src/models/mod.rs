//! Data models
//!
//! Row types for the cached Workwize entities, serialized as-is by the API.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are the remote API's id rendered as `String`.

pub mod address;
pub mod asset;
pub mod country;
pub mod employee;
pub mod offboard;
pub mod office;
pub mod order;
pub mod product;
pub mod warehouse;

// Re-exports
pub use address::*;
pub use asset::*;
pub use country::*;
pub use employee::*;
pub use offboard::*;
pub use office::*;
pub use order::*;
pub use product::*;
pub use warehouse::*;
