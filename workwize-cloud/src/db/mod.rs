//! Database access layer
//!
//! One module per table with free functions over `&PgPool`; [`PgStore`]
//! adapts them to the sync orchestrator's [`RecordStore`].

pub mod addresses;
pub mod assets;
pub mod assistant;
pub mod countries;
pub mod employees;
pub mod listing;
pub mod offboards;
pub mod offices;
pub mod orders;
pub mod products;
pub mod status;
pub mod sync_runs;
pub mod warehouses;

use async_trait::async_trait;
use shared::SyncOutcome;
use shared::models::{Address, Asset, Country, Employee, Offboard, Office, Order, Product, Warehouse};
use sqlx::PgPool;

pub use crate::error::BoxError;
use crate::sync::store::RecordStore;

/// Postgres-backed [`RecordStore`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn upsert_address(&self, row: &Address) -> Result<(), BoxError> {
        addresses::upsert(&self.pool, row).await
    }

    async fn upsert_country(&self, row: &Country) -> Result<(), BoxError> {
        countries::upsert(&self.pool, row).await
    }

    async fn upsert_warehouse(&self, row: &Warehouse) -> Result<(), BoxError> {
        warehouses::upsert(&self.pool, row).await
    }

    async fn upsert_office(&self, row: &Office) -> Result<(), BoxError> {
        offices::upsert(&self.pool, row).await
    }

    async fn upsert_employee(&self, row: &Employee) -> Result<(), BoxError> {
        employees::upsert(&self.pool, row).await
    }

    async fn upsert_product(&self, row: &Product) -> Result<(), BoxError> {
        products::upsert(&self.pool, row).await
    }

    async fn upsert_asset(&self, row: &Asset) -> Result<(), BoxError> {
        assets::upsert(&self.pool, row).await
    }

    async fn upsert_order(&self, row: &Order) -> Result<(), BoxError> {
        orders::upsert(&self.pool, row).await
    }

    async fn upsert_offboard(&self, row: &Offboard) -> Result<(), BoxError> {
        offboards::upsert(&self.pool, row).await
    }

    async fn link_manager(&self, employee_id: &str, manager_id: &str) -> Result<(), BoxError> {
        employees::link_manager(&self.pool, employee_id, manager_id).await
    }

    async fn link_employee_address(&self, employee_id: &str, address_id: &str) -> Result<(), BoxError> {
        employees::link_address(&self.pool, employee_id, address_id).await
    }

    async fn link_warehouse_address(&self, warehouse_id: &str, address_id: &str) -> Result<(), BoxError> {
        warehouses::link_address(&self.pool, warehouse_id, address_id).await
    }

    async fn employee_ids(&self) -> Result<Vec<String>, BoxError> {
        employees::ids(&self.pool).await
    }

    async fn warehouses_without_address(&self) -> Result<Vec<(String, Option<String>)>, BoxError> {
        warehouses::without_address(&self.pool).await
    }

    async fn record_run(
        &self,
        outcome: &SyncOutcome,
        started_at: i64,
        finished_at: i64,
    ) -> Result<(), BoxError> {
        sync_runs::insert(&self.pool, outcome, started_at, finished_at).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::now_millis;

    fn product(id: &str, name: &str) -> Product {
        let now = now_millis();
        Product {
            id: id.to_string(),
            name: Some(name.to_string()),
            sku: None,
            category: Some("Laptops".into()),
            description: None,
            manufacturer: Some("Dell".into()),
            model: None,
            price: Some(rust_decimal::Decimal::new(129_900, 2)),
            currency: Some("EUR".into()),
            status: Some("active".into()),
            stock_quantity: Some(3),
            created_at: now,
            updated_at: now,
        }
    }

    /// Needs a migrated Postgres at `DATABASE_URL`.
    #[tokio::test]
    #[ignore]
    async fn test_upsert_same_id_updates_row() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
        let pool = PgPool::connect(&url).await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let store = PgStore::new(pool.clone());

        let id = format!("test-{}", now_millis());
        store.upsert_product(&product(&id, "Latitude 5440")).await.unwrap();
        store.upsert_product(&product(&id, "Latitude 7440")).await.unwrap();

        let row = products::get(&pool, &id).await.unwrap().unwrap();
        assert_eq!(row.name.as_deref(), Some("Latitude 7440"));
        let (rows, total) = products::list(
            &pool,
            &[listing::Filter::text("id", id.clone())],
            shared::request::PageRequest::default(),
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows.len(), 1);

        // Dangling product reference is stored as NULL rather than failing
        let asset = Asset {
            id: id.clone(),
            asset_tag: None,
            name: None,
            category: None,
            status: None,
            serial_number: None,
            product_id: Some("missing-product".into()),
            assigned_to_id: None,
            location: None,
            purchase_date: None,
            purchase_price: None,
            currency: None,
            warranty_expires: None,
            notes: None,
            office_id: None,
            warehouse_id: None,
            created_at: 0,
            updated_at: 0,
        };
        store.upsert_asset(&asset).await.unwrap();
        assert_eq!(assets::get(&pool, &id).await.unwrap().unwrap().product_id, None);

        sqlx::query("DELETE FROM assets WHERE id = $1").bind(&id).execute(&pool).await.unwrap();
        sqlx::query("DELETE FROM products WHERE id = $1").bind(&id).execute(&pool).await.unwrap();
    }
}
