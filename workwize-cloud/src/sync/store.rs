//! Persistence seam for the sync orchestrator
//!
//! [`RecordStore`] is implemented by [`crate::db::PgStore`]; the tests use
//! [`memory::MemoryStore`].

use async_trait::async_trait;
use shared::SyncOutcome;
use shared::models::{Address, Asset, Country, Employee, Offboard, Office, Order, Product, Warehouse};

use crate::error::BoxError;

/// Upsert sink keyed by remote id, last write wins.
///
/// A foreign key whose target row is not stored yet is written as NULL.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn upsert_address(&self, row: &Address) -> Result<(), BoxError>;
    /// Keyed by country code
    async fn upsert_country(&self, row: &Country) -> Result<(), BoxError>;
    async fn upsert_warehouse(&self, row: &Warehouse) -> Result<(), BoxError>;
    async fn upsert_office(&self, row: &Office) -> Result<(), BoxError>;
    async fn upsert_employee(&self, row: &Employee) -> Result<(), BoxError>;
    async fn upsert_product(&self, row: &Product) -> Result<(), BoxError>;
    async fn upsert_asset(&self, row: &Asset) -> Result<(), BoxError>;
    async fn upsert_order(&self, row: &Order) -> Result<(), BoxError>;
    async fn upsert_offboard(&self, row: &Offboard) -> Result<(), BoxError>;

    /// Point `employee_id` at its manager, if the manager is stored.
    async fn link_manager(&self, employee_id: &str, manager_id: &str) -> Result<(), BoxError>;
    async fn link_employee_address(&self, employee_id: &str, address_id: &str) -> Result<(), BoxError>;
    async fn link_warehouse_address(&self, warehouse_id: &str, address_id: &str) -> Result<(), BoxError>;

    /// Every stored employee id, ordered
    async fn employee_ids(&self) -> Result<Vec<String>, BoxError>;
    /// `(id, code)` of warehouses with no address
    async fn warehouses_without_address(&self) -> Result<Vec<(String, Option<String>)>, BoxError>;

    async fn record_run(
        &self,
        outcome: &SyncOutcome,
        started_at: i64,
        finished_at: i64,
    ) -> Result<(), BoxError>;
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct Tables {
        pub addresses: BTreeMap<String, Address>,
        pub countries: BTreeMap<String, Country>,
        pub warehouses: BTreeMap<String, Warehouse>,
        pub offices: BTreeMap<String, Office>,
        pub employees: BTreeMap<String, Employee>,
        pub products: BTreeMap<String, Product>,
        pub assets: BTreeMap<String, Asset>,
        pub orders: BTreeMap<String, Order>,
        pub offboards: BTreeMap<String, Offboard>,
        pub runs: Vec<SyncOutcome>,
    }

    /// In-memory store that resolves references like the SQL sub-selects do,
    /// keeping an existing manager or address link when the new one dangles.
    #[derive(Default)]
    pub struct MemoryStore {
        pub tables: Mutex<Tables>,
        /// Asset ids whose upsert fails
        pub failing_assets: HashSet<String>,
    }

    impl MemoryStore {
        pub fn with_failing_assets(ids: &[&str]) -> Self {
            Self {
                failing_assets: ids.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
            self.tables.lock().unwrap()
        }
    }

    fn resolve<T>(table: &BTreeMap<String, T>, id: &Option<String>) -> Option<String> {
        id.clone().filter(|id| table.contains_key(id))
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn upsert_address(&self, row: &Address) -> Result<(), BoxError> {
            self.tables().addresses.insert(row.id.clone(), row.clone());
            Ok(())
        }

        async fn upsert_country(&self, row: &Country) -> Result<(), BoxError> {
            self.tables().countries.insert(row.code.clone(), row.clone());
            Ok(())
        }

        async fn upsert_warehouse(&self, row: &Warehouse) -> Result<(), BoxError> {
            let mut t = self.tables();
            let mut row = row.clone();
            let kept = t.warehouses.get(&row.id).and_then(|w| w.address_id.clone());
            row.address_id = resolve(&t.addresses, &row.address_id).or(kept);
            t.warehouses.insert(row.id.clone(), row);
            Ok(())
        }

        async fn upsert_office(&self, row: &Office) -> Result<(), BoxError> {
            let mut t = self.tables();
            let mut row = row.clone();
            row.address_id = resolve(&t.addresses, &row.address_id);
            t.offices.insert(row.id.clone(), row);
            Ok(())
        }

        async fn upsert_employee(&self, row: &Employee) -> Result<(), BoxError> {
            let mut t = self.tables();
            let mut row = row.clone();
            let existing = t.employees.get(&row.id).cloned();
            row.manager_id = resolve(&t.employees, &row.manager_id)
                .or_else(|| existing.as_ref().and_then(|e| e.manager_id.clone()));
            row.office_id = resolve(&t.offices, &row.office_id);
            row.address_id = resolve(&t.addresses, &row.address_id)
                .or_else(|| existing.as_ref().and_then(|e| e.address_id.clone()));
            t.employees.insert(row.id.clone(), row);
            Ok(())
        }

        async fn upsert_product(&self, row: &Product) -> Result<(), BoxError> {
            self.tables().products.insert(row.id.clone(), row.clone());
            Ok(())
        }

        async fn upsert_asset(&self, row: &Asset) -> Result<(), BoxError> {
            if self.failing_assets.contains(&row.id) {
                return Err(format!("constraint violation on asset {}", row.id).into());
            }
            let mut t = self.tables();
            let mut row = row.clone();
            row.product_id = resolve(&t.products, &row.product_id);
            row.assigned_to_id = resolve(&t.employees, &row.assigned_to_id);
            row.office_id = resolve(&t.offices, &row.office_id);
            row.warehouse_id = resolve(&t.warehouses, &row.warehouse_id);
            t.assets.insert(row.id.clone(), row);
            Ok(())
        }

        async fn upsert_order(&self, row: &Order) -> Result<(), BoxError> {
            let mut t = self.tables();
            let mut row = row.clone();
            row.employee_id = resolve(&t.employees, &row.employee_id);
            row.warehouse_id = resolve(&t.warehouses, &row.warehouse_id);
            t.orders.insert(row.id.clone(), row);
            Ok(())
        }

        async fn upsert_offboard(&self, row: &Offboard) -> Result<(), BoxError> {
            let mut t = self.tables();
            let mut row = row.clone();
            row.employee_id = resolve(&t.employees, &row.employee_id);
            t.offboards.insert(row.id.clone(), row);
            Ok(())
        }

        async fn link_manager(&self, employee_id: &str, manager_id: &str) -> Result<(), BoxError> {
            let mut t = self.tables();
            let manager = resolve(&t.employees, &Some(manager_id.to_string()));
            if let Some(e) = t.employees.get_mut(employee_id) {
                e.manager_id = manager;
            }
            Ok(())
        }

        async fn link_employee_address(&self, employee_id: &str, address_id: &str) -> Result<(), BoxError> {
            let mut t = self.tables();
            let address = resolve(&t.addresses, &Some(address_id.to_string()));
            if let Some(e) = t.employees.get_mut(employee_id) {
                e.address_id = address;
            }
            Ok(())
        }

        async fn link_warehouse_address(&self, warehouse_id: &str, address_id: &str) -> Result<(), BoxError> {
            let mut t = self.tables();
            let address = resolve(&t.addresses, &Some(address_id.to_string()));
            if let Some(w) = t.warehouses.get_mut(warehouse_id) {
                w.address_id = address;
            }
            Ok(())
        }

        async fn employee_ids(&self) -> Result<Vec<String>, BoxError> {
            Ok(self.tables().employees.keys().cloned().collect())
        }

        async fn warehouses_without_address(&self) -> Result<Vec<(String, Option<String>)>, BoxError> {
            Ok(self
                .tables()
                .warehouses
                .values()
                .filter(|w| w.address_id.is_none())
                .map(|w| (w.id.clone(), w.code.clone()))
                .collect())
        }

        async fn record_run(
            &self,
            outcome: &SyncOutcome,
            _started_at: i64,
            _finished_at: i64,
        ) -> Result<(), BoxError> {
            self.tables().runs.push(outcome.clone());
            Ok(())
        }
    }
}
