//! Application context: every store, built once and passed down.

use crate::app::actions::{ActionHook, ActionMessages};
use crate::client::{ApiClient, Credentials, ResourceClient};
use crate::domain::{Pump, PumpModel, Resource};
use crate::storage::SnapshotStore;
use crate::store::{AuthStore, Catalogs, DashboardStore, ResourceStore};
use std::sync::Arc;
use std::time::Duration;

/// Schema version stamped on persisted snapshots. Bump when a record type
/// changes shape; older snapshots are then discarded on load.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Shared services for one running client.
#[derive(Debug)]
pub struct AppContext {
    pub credentials: Credentials,
    pub api: ApiClient,
    pub auth: AuthStore,
    pub pumps: Arc<ResourceStore<Pump>>,
    pub models: Arc<ResourceStore<PumpModel>>,
    pub catalogs: Catalogs,
    pub dashboard: DashboardStore,
    message_ttl: Duration,
}

fn store<T: Resource>(api: &ApiClient, snapshots: Option<&Arc<dyn SnapshotStore>>) -> ResourceStore<T> {
    let store = ResourceStore::new(ResourceClient::new(api.clone()));
    match snapshots {
        Some(backend) => store.with_persistence(Arc::clone(backend), SNAPSHOT_VERSION),
        None => store,
    }
}

impl AppContext {
    /// Wires every store to `api`, persisting collections to `snapshots` when
    /// given.
    #[must_use]
    pub fn new(api: ApiClient, snapshots: Option<Arc<dyn SnapshotStore>>, message_ttl: Duration) -> Self {
        let snapshots = snapshots.as_ref();
        Self {
            credentials: api.credentials().clone(),
            auth: AuthStore::new(api.clone()),
            pumps: Arc::new(store(&api, snapshots)),
            models: Arc::new(store(&api, snapshots)),
            catalogs: Catalogs::from_stores(store(&api, snapshots), store(&api, snapshots)),
            dashboard: DashboardStore::new(api.clone()),
            api,
            message_ttl,
        }
    }

    /// TTL applied to every action hook built by this context.
    #[must_use]
    pub const fn message_ttl(&self) -> Duration {
        self.message_ttl
    }

    /// Action hook for pump screens.
    #[must_use]
    pub fn pump_actions(&self) -> ActionHook<Pump> {
        ActionHook::new(Arc::clone(&self.pumps))
            .with_messages(ActionMessages::for_kind("Pump"))
            .with_ttl(self.message_ttl)
    }

    /// Action hook for pump model screens.
    #[must_use]
    pub fn model_actions(&self) -> ActionHook<PumpModel> {
        ActionHook::new(Arc::clone(&self.models))
            .with_messages(ActionMessages::for_kind("Model"))
            .with_ttl(self.message_ttl)
    }

    /// Logs out and empties every store, including persisted snapshots and the
    /// dashboard summary.
    pub fn sign_out(&self) {
        self.auth.logout();
        self.pumps.reset();
        self.models.reset();
        self.catalogs.reset();
        self.dashboard.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use crate::storage::JsonSnapshotStore;
    use serde_json::json;

    #[tokio::test]
    async fn sign_out_clears_token_and_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let backend: Arc<dyn SnapshotStore> = Arc::new(JsonSnapshotStore::new(dir.path()).unwrap());
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            json!({ "success": true, "data": [
                { "id": 1, "serial_number": "SN-1", "inventory_code": "INV-1", "model_id": 1,
                  "institution_id": null, "service_id": null, "status": "available" }
            ] }),
        );
        transport.push_json(200, json!({ "success": true, "data": { "total_pumps": 9 } }));
        let credentials = Credentials::in_memory();
        credentials.set_token("abc");
        let api = ApiClient::new("http://api.test", transport.clone(), credentials.clone());
        let context = AppContext::new(api, Some(Arc::clone(&backend)), Duration::from_secs(7));

        context.pumps.fetch_all().await;
        assert!(dir.path().join("pumps.json").exists());
        assert_eq!(context.pump_actions().store().snapshot().len(), 1);
        assert!(context.dashboard.refresh().await);
        assert_eq!(context.dashboard.snapshot().data.map(|d| d.total_pumps), Some(9));

        context.sign_out();
        assert!(!credentials.is_authenticated());
        assert!(context.pumps.snapshot().is_empty());
        assert!(!dir.path().join("pumps.json").exists());
        assert!(context.dashboard.snapshot().data.is_none());
    }

    #[test]
    fn stores_share_credentials() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = ApiClient::new("http://api.test", transport, Credentials::in_memory());
        let context = AppContext::new(api, None, Duration::from_secs(3));

        context.credentials.set_token("shared");
        assert!(context.auth.is_authenticated());
        assert_eq!(context.message_ttl(), Duration::from_secs(3));
        assert_eq!(context.catalogs.services.name(), "services");
    }
}
