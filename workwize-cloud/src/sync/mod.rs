//! Sync orchestrator: Workwize → scrub → transform → upsert
//!
//! Resource types run sequentially in [`SyncResource::ALL`] order. Each
//! record is scrubbed before it is transformed, so nothing unredacted ever
//! reaches the store. A failing type or record is counted and skipped.

pub mod locations;
pub mod store;
pub mod transform;

use serde_json::Value;
use shared::models::Address;
use shared::util::now_millis;
use shared::{SyncOutcome, SyncReport, SyncResource};
use std::sync::Arc;
use std::time::Duration;

use crate::error::BoxError;
use crate::pii;
use crate::workwize::{WorkwizeApi, WorkwizeError};
use store::RecordStore;

/// Outcome of a type whose collection could not be fetched
fn fetch_failed(resource: SyncResource, error: WorkwizeError) -> SyncOutcome {
    let outcome = SyncOutcome::fetch_failed(resource, error.to_string());
    match error {
        WorkwizeError::Upstream { status, body } => outcome.with_upstream(status, body),
        _ => outcome,
    }
}

pub struct SyncOrchestrator {
    api: Arc<dyn WorkwizeApi>,
    store: Arc<dyn RecordStore>,
    /// Pause between per-employee address calls
    address_delay: Duration,
}

impl SyncOrchestrator {
    pub fn new(api: Arc<dyn WorkwizeApi>, store: Arc<dyn RecordStore>, address_delay: Duration) -> Self {
        Self {
            api,
            store,
            address_delay,
        }
    }

    /// Sync every resource type in dependency order.
    pub async fn run_all(&self) -> SyncReport {
        let started_at = now_millis();
        tracing::info!("Sync pass started");

        let mut outcomes = Vec::with_capacity(SyncResource::ALL.len());
        for resource in SyncResource::ALL {
            outcomes.push(self.run_one(resource).await);
        }

        let report = SyncReport {
            outcomes,
            started_at,
            finished_at: now_millis(),
        };
        tracing::info!(
            succeeded = report.total_succeeded(),
            failed = report.total_failed(),
            duration_ms = report.finished_at - report.started_at,
            "Sync pass finished"
        );
        report
    }

    /// Sync one resource type and record the run.
    pub async fn run_one(&self, resource: SyncResource) -> SyncOutcome {
        let started_at = now_millis();
        tracing::info!(resource = %resource, "Sync started");

        let outcome = match resource {
            SyncResource::Addresses => self.sync_addresses().await,
            other => self.sync_collection(other).await,
        };
        let finished_at = now_millis();

        if let Err(e) = self.store.record_run(&outcome, started_at, finished_at).await {
            tracing::warn!(resource = %resource, error = %e, "Failed to record sync run");
        }

        match &outcome.error_message {
            Some(error) if outcome.succeeded == 0 && outcome.failed == 0 => {
                tracing::error!(resource = %resource, error = %error, "Sync failed");
            }
            _ => tracing::info!(
                resource = %resource,
                succeeded = outcome.succeeded,
                failed = outcome.failed,
                duration_ms = finished_at - started_at,
                "Sync finished"
            ),
        }
        outcome
    }

    async fn sync_collection(&self, resource: SyncResource) -> SyncOutcome {
        let records = match self.api.fetch_collection(resource.as_str()).await {
            Ok(records) => records,
            Err(e) => return fetch_failed(resource, e),
        };
        tracing::debug!(resource = %resource, count = records.len(), "Fetched records");

        let mut outcome = SyncOutcome::new(resource);
        let mut managers = Vec::new();
        for raw in &records {
            let clean = pii::scrub(raw, resource);
            match self.persist(resource, &clean, &mut managers).await {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    tracing::debug!(resource = %resource, error = %e, "Record skipped");
                    outcome.record_failure(e.to_string());
                }
            }
        }

        match resource {
            SyncResource::Employees => self.link_managers(&managers).await,
            SyncResource::Warehouses => self.link_warehouse_sites().await,
            _ => {}
        }
        outcome
    }

    /// Transform and upsert one scrubbed record.
    ///
    /// Employee → manager pairs are collected for the second pass.
    async fn persist(
        &self,
        resource: SyncResource,
        record: &Value,
        managers: &mut Vec<(String, String)>,
    ) -> Result<(), BoxError> {
        match resource {
            SyncResource::Warehouses => {
                let row = transform::warehouse(record)?;
                self.store_embedded_address(record, None).await?;
                self.store.upsert_warehouse(&row).await
            }
            SyncResource::Offices => {
                let row = transform::office(record)?;
                self.store_embedded_address(record, None).await?;
                self.store.upsert_office(&row).await
            }
            SyncResource::Employees => {
                let row = transform::employee(record)?;
                self.store_embedded_address(record, Some(&row.id)).await?;
                self.store.upsert_employee(&row).await?;
                if let Some(manager_id) = &row.manager_id {
                    managers.push((row.id.clone(), manager_id.clone()));
                }
                Ok(())
            }
            SyncResource::Addresses => self.store_address(record, None).await.map(|_| ()),
            SyncResource::Products => self.store.upsert_product(&transform::product(record)?).await,
            SyncResource::Assets => self.store.upsert_asset(&transform::asset(record)?).await,
            SyncResource::Orders => self.store.upsert_order(&transform::order(record)?).await,
            SyncResource::Offboards => self.store.upsert_offboard(&transform::offboard(record)?).await,
        }
    }

    /// Upsert an address record and its country; returns the address id.
    async fn store_address(&self, record: &Value, employee_id: Option<&str>) -> Result<String, BoxError> {
        let row = transform::address(record, employee_id)?;
        self.store.upsert_address(&row).await?;
        self.store_country(record).await;
        Ok(row.id)
    }

    async fn store_embedded_address(&self, record: &Value, employee_id: Option<&str>) -> Result<(), BoxError> {
        if let Some(row) = transform::embedded_address(record, employee_id) {
            self.store.upsert_address(&row).await?;
            if let Some(inner) = record.get("address") {
                self.store_country(inner).await;
            }
        }
        Ok(())
    }

    /// Country reference data is best effort; a failure never fails the address.
    async fn store_country(&self, address: &Value) {
        let Some(country) = transform::country(address) else {
            return;
        };
        if let Err(e) = self.store.upsert_country(&country).await {
            tracing::warn!(code = %country.code, error = %e, "Failed to upsert country");
        }
    }

    async fn link_managers(&self, pairs: &[(String, String)]) {
        for (employee_id, manager_id) in pairs {
            if let Err(e) = self.store.link_manager(employee_id, manager_id).await {
                tracing::warn!(employee_id, manager_id, error = %e, "Failed to link manager");
            }
        }
        tracing::debug!(count = pairs.len(), "Manager links rebuilt");
    }

    /// Give address-less warehouses at known sites a synthetic address.
    async fn link_warehouse_sites(&self) {
        let pending = match self.store.warehouses_without_address().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list warehouses without address");
                return;
            }
        };

        for (warehouse_id, code) in pending {
            let Some(address) = code.as_deref().and_then(locations::synthetic_address) else {
                continue;
            };
            if let Err(e) = self.link_warehouse_site(&warehouse_id, &address).await {
                tracing::warn!(warehouse_id, error = %e, "Failed to link warehouse site");
            }
        }
    }

    async fn link_warehouse_site(&self, warehouse_id: &str, address: &Address) -> Result<(), BoxError> {
        self.store.upsert_address(address).await?;
        self.store.link_warehouse_address(warehouse_id, &address.id).await
    }

    async fn store_employee_address(&self, employee_id: &str, record: &Value) -> Result<(), BoxError> {
        let address_id = self.store_address(record, Some(employee_id)).await?;
        self.store.link_employee_address(employee_id, &address_id).await
    }

    /// Pull each stored employee's address.
    async fn sync_addresses(&self) -> SyncOutcome {
        let resource = SyncResource::Addresses;
        let employee_ids = match self.store.employee_ids().await {
            Ok(ids) => ids,
            Err(e) => return SyncOutcome::fetch_failed(resource, e.to_string()),
        };

        let mut outcome = SyncOutcome::new(resource);
        for (i, employee_id) in employee_ids.iter().enumerate() {
            if i > 0 && !self.address_delay.is_zero() {
                tokio::time::sleep(self.address_delay).await;
            }

            let raw = match self.api.employee_address(employee_id).await {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    outcome.record_failure(format!("employee {employee_id}: {e}"));
                    continue;
                }
            };

            let clean = pii::scrub(&raw, resource);
            match self.store_employee_address(employee_id, &clean).await {
                Ok(()) => outcome.record_success(),
                Err(e) => outcome.record_failure(format!("employee {employee_id}: {e}")),
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workwize::WorkwizeError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use store::memory::MemoryStore;

    /// Canned Workwize responses; a missing path is an upstream 503.
    #[derive(Default)]
    struct FakeApi {
        collections: HashMap<&'static str, Vec<Value>>,
        addresses: HashMap<&'static str, Value>,
    }

    #[async_trait]
    impl WorkwizeApi for FakeApi {
        async fn fetch_collection(&self, path: &str) -> Result<Vec<Value>, WorkwizeError> {
            self.collections
                .get(path)
                .cloned()
                .ok_or_else(|| WorkwizeError::Upstream {
                    status: 503,
                    body: "unavailable".into(),
                })
        }

        async fn employee_address(&self, employee_id: &str) -> Result<Option<Value>, WorkwizeError> {
            Ok(self.addresses.get(employee_id).cloned())
        }
    }

    fn orchestrator(api: FakeApi, store: Arc<MemoryStore>) -> SyncOrchestrator {
        SyncOrchestrator::new(Arc::new(api), store, Duration::ZERO)
    }

    fn sample_api() -> FakeApi {
        let mut api = FakeApi::default();
        api.collections.insert(
            "warehouses",
            vec![json!({"id": "w1", "code": "LDW", "name": "London DC"})],
        );
        api.collections.insert(
            "offices",
            vec![json!({"id": "o1", "name": "HQ", "phone": "+31 20 123 4567",
                        "address": {"id": "a-o1", "city": "Amsterdam", "street": "Damrak 1"}})],
        );
        // Report lists the employee before their manager
        api.collections.insert(
            "employees",
            vec![
                json!({"id": "e2", "first_name": "Bob", "last_name": "Stone",
                       "email": "bob@corp.io", "phone": "555-123-4567",
                       "manager_id": "e1", "office": {"id": "o1"}}),
                json!({"id": "e1", "first_name": "Alice", "last_name": "Wong",
                       "email": "alice@corp.io", "isDeactivated": false}),
            ],
        );
        api.addresses.insert(
            "e1",
            json!({"id": "a1", "city": "Leipzig", "address_line_1": "Hauptstr. 5",
                   "country": {"id": "276", "name": "Germany", "code": "DE"}}),
        );
        api.collections.insert("products", vec![json!({"id": "p1", "name": "Apple, MacBook Air"})]);
        api.collections.insert(
            "assets",
            vec![json!({"id": "as1", "product": {"id": "p1"}, "status": "in_use",
                        "notes": "Given to Alice, call 555-987-6543",
                        "location": {"location_type": "employee",
                                     "location_detail": {"id": "e1", "city": "Leipzig",
                                                         "first_name": "Alice", "last_name": "Wong"}}})],
        );
        api.collections.insert(
            "orders",
            vec![json!({"id": "or1", "receiver": "Bob Stone", "receiver_type": "employee",
                        "receiver_id": "e2", "notes": "ring bob@corp.io"})],
        );
        api.collections.insert(
            "offboards",
            vec![json!({"id": "off1", "employee_id": "e2", "assets_count": 0})],
        );
        api
    }

    #[tokio::test]
    async fn test_run_all_persists_scrubbed_rows() {
        let store = Arc::new(MemoryStore::default());
        let report = orchestrator(sample_api(), store.clone()).run_all().await;

        assert_eq!(report.outcomes.len(), 8);
        assert_eq!(report.total_failed(), 0);
        assert!(report.finished_at >= report.started_at);

        let t = store.tables();
        let alice = &t.employees["e1"];
        assert_eq!(alice.first_name.as_deref(), Some("A***"));
        assert_eq!(alice.last_name, None);
        assert_eq!(alice.email.as_deref(), Some("a***@***.com"));
        assert_eq!(alice.address_id.as_deref(), Some("a1"));
        assert_eq!(t.employees["e2"].office_id.as_deref(), Some("o1"));

        let asset = &t.assets["as1"];
        assert_eq!(asset.assigned_to_id.as_deref(), Some("e1"));
        assert_eq!(asset.product_id.as_deref(), Some("p1"));
        let notes = asset.notes.as_deref().unwrap();
        assert!(!notes.contains("Alice"));
        assert!(!notes.contains("555-987-6543"));

        let order = &t.orders["or1"];
        assert_eq!(order.employee_id.as_deref(), Some("e2"));
        assert_eq!(order.receiver.as_deref(), Some("B***"));
        assert!(!order.notes.as_deref().unwrap().contains("bob@corp.io"));

        assert!(t.offboards["off1"].returned_assets);
        assert_eq!(t.countries["DE"].name, "Germany");
        assert_eq!(t.runs.len(), 8);
    }

    #[tokio::test]
    async fn test_manager_linked_in_second_pass() {
        let store = Arc::new(MemoryStore::default());
        let outcome = orchestrator(sample_api(), store.clone())
            .run_one(SyncResource::Employees)
            .await;

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(store.tables().employees["e2"].manager_id.as_deref(), Some("e1"));
    }

    #[tokio::test]
    async fn test_no_plaintext_pii_reaches_store() {
        let store = Arc::new(MemoryStore::default());
        orchestrator(sample_api(), store.clone()).run_all().await;

        let t = store.tables();
        let dump = serde_json::to_string(&(
            t.employees.values().collect::<Vec<_>>(),
            t.addresses.values().collect::<Vec<_>>(),
            t.offices.values().collect::<Vec<_>>(),
            t.orders.values().collect::<Vec<_>>(),
            t.assets.values().collect::<Vec<_>>(),
        ))
        .unwrap();
        for secret in [
            "alice@corp.io",
            "bob@corp.io",
            "555-123-4567",
            "555-987-6543",
            "+31 20 123 4567",
            "Hauptstr. 5",
            "Damrak 1",
            "Wong",
            "Stone",
        ] {
            assert!(!dump.contains(secret), "{secret} leaked");
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_stop_other_types() {
        let mut api = sample_api();
        api.collections.remove("products");
        let store = Arc::new(MemoryStore::default());
        let report = orchestrator(api, store.clone()).run_all().await;

        let products = report
            .outcomes
            .iter()
            .find(|o| o.resource == SyncResource::Products)
            .unwrap();
        assert_eq!(products.succeeded, 0);
        assert_eq!(products.failed, 0);
        assert!(products.error_message.as_deref().unwrap().contains("503"));
        let upstream = products.upstream.as_ref().unwrap();
        assert_eq!((upstream.status, upstream.body.as_str()), (503, "unavailable"));

        let t = store.tables();
        assert_eq!(t.orders.len(), 1);
        // Product reference is dangling, so stored as NULL
        assert_eq!(t.assets["as1"].product_id, None);
    }

    #[tokio::test]
    async fn test_bad_records_counted_first_error_kept() {
        let mut api = FakeApi::default();
        api.collections.insert(
            "assets",
            vec![
                json!({"id": "ok"}),
                json!({"name": "no id"}),
                json!({"id": "boom"}),
                json!({"id": "ok2"}),
            ],
        );
        let store = Arc::new(MemoryStore::with_failing_assets(&["boom"]));
        let outcome = orchestrator(api, store.clone()).run_one(SyncResource::Assets).await;

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.error_message.as_deref(), Some("record has no id"));
        assert_eq!(store.tables().assets.len(), 2);
    }

    #[tokio::test]
    async fn test_resync_updates_existing_rows() {
        let store = Arc::new(MemoryStore::default());
        let mut api = FakeApi::default();
        api.collections.insert("products", vec![json!({"id": "p1", "name": "Old"})]);
        orchestrator(api, store.clone()).run_one(SyncResource::Products).await;

        let mut api = FakeApi::default();
        api.collections.insert("products", vec![json!({"id": "p1", "name": "New"})]);
        orchestrator(api, store.clone()).run_one(SyncResource::Products).await;

        let t = store.tables();
        assert_eq!(t.products.len(), 1);
        assert_eq!(t.products["p1"].name.as_deref(), Some("New"));
    }

    #[tokio::test]
    async fn test_missing_addresses_are_skipped() {
        let mut api = sample_api();
        api.addresses.clear();
        let store = Arc::new(MemoryStore::default());
        let sync = orchestrator(api, store.clone());
        sync.run_one(SyncResource::Employees).await;
        let outcome = sync.run_one(SyncResource::Addresses).await;

        assert_eq!(outcome.succeeded, 0);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.error_message.is_none());
    }

    #[tokio::test]
    async fn test_known_warehouse_gets_site_address() {
        let store = Arc::new(MemoryStore::default());
        orchestrator(sample_api(), store.clone())
            .run_one(SyncResource::Warehouses)
            .await;

        let t = store.tables();
        assert_eq!(t.warehouses["w1"].address_id.as_deref(), Some("wh-LDW"));
        assert_eq!(t.addresses["wh-LDW"].city.as_deref(), Some("London"));
    }
}
