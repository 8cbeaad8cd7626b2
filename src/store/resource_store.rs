//! Resource store: one remote collection mirrored in memory.
//!
//! A [`ResourceStore`] owns the [`CollectionState`] of one entity type and keeps it
//! in sync with the server through a [`ResourceClient`].
//!
//! # Reconciliation
//!
//! - `fetch_all` replaces the collection wholesale and never returns an error;
//!   failures are recorded in `error` and the stale items are kept.
//! - `create` re-synchronizes with a full `fetch_all`, so server-assigned fields
//!   and server ordering are picked up.
//! - `update` and `delete` patch the single affected record in place.
//!
//! # Concurrency
//!
//! There is no lock held across requests. Overlapping mutations all proceed and
//! whichever response lands last performs the final `items`/`loading`/`error`
//! write. Screens are expected to disable their controls while an action is
//! running.

use crate::app::search::{FilteredView, SearchOverlay};
use crate::client::ResourceClient;
use crate::domain::error::{InventoryError, Result};
use crate::domain::{ItemId, Resource, Searchable};
use crate::storage::{load_items, save_items, SnapshotStore};
use crate::store::state::CollectionState;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::Instrument;

struct Persistence {
    backend: Arc<dyn SnapshotStore>,
    version: u32,
}

/// In-memory collection of `T` backed by the `/<T::ENDPOINT>` REST resource.
pub struct ResourceStore<T: Resource> {
    name: String,
    client: ResourceClient<T>,
    state: RwLock<CollectionState<T>>,
    persistence: Option<Persistence>,
    overlay: Mutex<SearchOverlay<T>>,
}

impl<T: Resource> std::fmt::Debug for ResourceStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("ResourceStore")
            .field("name", &self.name)
            .field("items", &state.items.len())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .field("persisted", &self.persistence.is_some())
            .finish()
    }
}

impl<T: Resource> ResourceStore<T> {
    /// Creates an empty store named after the endpoint.
    #[must_use]
    pub fn new(client: ResourceClient<T>) -> Self {
        Self {
            name: T::ENDPOINT.to_string(),
            client,
            state: RwLock::new(CollectionState::default()),
            persistence: None,
            overlay: Mutex::new(SearchOverlay::default()),
        }
    }

    /// Overrides the store name used for logging and persistence.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attaches a snapshot backend and hydrates the items saved under this store's
    /// name at `version`.
    ///
    /// A missing, unreadable or version-mismatched snapshot leaves the store empty.
    #[must_use]
    pub fn with_persistence(mut self, backend: Arc<dyn SnapshotStore>, version: u32) -> Self {
        match load_items::<T>(backend.as_ref(), &self.name, version) {
            Ok(Some(items)) => {
                tracing::debug!(store = %self.name, count = items.len(), "hydrated from snapshot");
                self.write().replace_items(items.into_iter().map(Arc::new).collect());
            }
            Ok(None) => tracing::debug!(store = %self.name, "no usable snapshot, starting empty"),
            Err(e) => tracing::warn!(store = %self.name, error = %e, "failed to hydrate, starting empty"),
        }
        self.persistence = Some(Persistence { backend, version });
        self
    }

    /// Store name, used as the snapshot key and in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Client for this store's endpoint.
    #[must_use]
    pub const fn client(&self) -> &ResourceClient<T> {
        &self.client
    }

    fn read(&self) -> RwLockReadGuard<'_, CollectionState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CollectionState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state. Items are shared, not cloned.
    #[must_use]
    pub fn snapshot(&self) -> CollectionState<T> {
        self.read().clone()
    }

    /// Current copy of the record with `id`, if loaded.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<Arc<T>> {
        self.read().get(id).cloned()
    }

    pub(crate) fn begin(&self) {
        self.write().begin();
    }

    /// Lands a freshly fetched collection, replacing the current items.
    pub(crate) fn land_fetched(&self, items: Vec<T>) {
        let count = items.len();
        {
            let mut state = self.write();
            state.loading = false;
            state.replace_items(items.into_iter().map(Arc::new).collect());
            state.refresh_selection();
        }
        self.persist();
        tracing::debug!(store = %self.name, count, "collection fetched");
    }

    pub(crate) fn fail(&self, operation: &'static str, error: &InventoryError) {
        tracing::warn!(store = %self.name, operation, error = %error, "operation failed");
        self.write().fail(error.to_string());
    }

    /// Writes the current items to the snapshot backend. Failures are only logged.
    fn persist(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let items = self.read().items.clone();
        if let Err(e) = save_items(persistence.backend.as_ref(), &self.name, persistence.version, &items) {
            tracing::warn!(store = %self.name, error = %e, "failed to persist snapshot");
        }
    }

    /// Replaces the collection with the server's current list.
    ///
    /// Failures are recorded in the state and the previous items are kept.
    pub async fn fetch_all(&self) {
        let span = tracing::debug_span!("store_fetch_all", store = %self.name);
        async {
            self.begin();
            match self.client.list().await {
                Ok(items) => self.land_fetched(items),
                Err(e) => self.fail("fetch_all", &e),
            }
        }
        .instrument(span)
        .await;
    }

    /// Creates a record, then refetches the whole collection.
    ///
    /// Returns the server-assigned id when the server reports one. A failure of
    /// the follow-up refetch is recorded in the state but does not fail the create.
    ///
    /// # Errors
    ///
    /// Returns the create failure after recording it in `error`.
    pub async fn create(&self, input: &T::Create) -> Result<Option<ItemId>> {
        let span = tracing::debug_span!("store_create", store = %self.name);
        async {
            self.begin();
            match self.client.create(input).await {
                Ok(id) => {
                    tracing::debug!(id = ?id, "created, refetching collection");
                    self.fetch_all().await;
                    Ok(id)
                }
                Err(e) => {
                    self.fail("create", &e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Updates a record and swaps it into the collection in place.
    ///
    /// Every other item keeps its identity and position. If the record is not
    /// loaded locally the collection is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the update failure after recording it in `error`.
    pub async fn update(&self, id: ItemId, patch: &T::Patch) -> Result<Arc<T>> {
        let span = tracing::debug_span!("store_update", store = %self.name, id);
        async {
            self.begin();
            match self.client.update(id, patch).await {
                Ok(record) => {
                    let record = Arc::new(record);
                    let replaced = {
                        let mut state = self.write();
                        state.loading = false;
                        let replaced = match state.position(id) {
                            Some(index) => {
                                state.items[index] = Arc::clone(&record);
                                state.revision += 1;
                                true
                            }
                            None => false,
                        };
                        if state.selected.as_ref().is_some_and(|s| s.id() == id) {
                            state.selected = Some(Arc::clone(&record));
                        }
                        replaced
                    };
                    if replaced {
                        self.persist();
                    } else {
                        tracing::debug!("updated record is not loaded locally");
                    }
                    Ok(record)
                }
                Err(e) => {
                    self.fail("update", &e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Deletes a record and removes it from the collection.
    ///
    /// # Errors
    ///
    /// Returns the delete failure after recording it in `error`.
    pub async fn delete(&self, id: ItemId) -> Result<()> {
        let span = tracing::debug_span!("store_delete", store = %self.name, id);
        async {
            self.begin();
            match self.client.delete(id).await {
                Ok(()) => {
                    let removed = {
                        let mut state = self.write();
                        state.loading = false;
                        let removed = match state.position(id) {
                            Some(index) => {
                                state.items.remove(index);
                                state.revision += 1;
                                true
                            }
                            None => false,
                        };
                        if state.selected.as_ref().is_some_and(|s| s.id() == id) {
                            state.selected = None;
                        }
                        removed
                    };
                    if removed {
                        self.persist();
                    }
                    tracing::debug!(removed, "deleted");
                    Ok(())
                }
                Err(e) => {
                    self.fail("delete", &e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Clears `error` without touching anything else.
    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// Selects the loaded record with `id`. Returns `false` if it is not loaded.
    pub fn select(&self, id: ItemId) -> bool {
        let mut state = self.write();
        let found = state.get(id).cloned();
        let selected = found.is_some();
        state.selected = found;
        selected
    }

    /// Clears the selection.
    pub fn clear_selection(&self) {
        self.write().selected = None;
    }

    /// Sets the raw search term used by [`ResourceStore::filtered`].
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.write().search_term = term.into();
    }

    /// Empties the store and forgets its persisted snapshot.
    pub fn reset(&self) {
        {
            let mut state = self.write();
            let revision = state.revision + 1;
            *state = CollectionState {
                revision,
                ..CollectionState::default()
            };
        }
        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.backend.remove(&self.name) {
                tracing::warn!(store = %self.name, error = %e, "failed to remove snapshot");
            }
        }
        tracing::debug!(store = %self.name, "store reset");
    }
}

impl<T: Resource + Searchable> ResourceStore<T> {
    /// Items matching the current search term.
    #[must_use]
    pub fn filtered(&self) -> FilteredView<T> {
        let state = self.read();
        self.overlay
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .view(&state.items, state.revision, &state.search_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use crate::client::{ApiClient, Credentials};
    use crate::domain::{NewPumpModel, PumpModel, PumpModelPatch};
    use crate::storage::JsonSnapshotStore;
    use crate::store::StoreStatus;
    use serde_json::{json, Value};

    fn store(transport: &Arc<ScriptedTransport>) -> ResourceStore<PumpModel> {
        let api = ApiClient::new("http://api.test", transport.clone(), Credentials::in_memory());
        ResourceStore::new(ResourceClient::new(api))
    }

    fn model(id: i64, code: &str, name: &str) -> Value {
        json!({ "id": id, "code": code, "name": name, "manufacturer": "Acme" })
    }

    fn ok(data: Value) -> Value {
        json!({ "success": true, "data": data })
    }

    async fn loaded(transport: &Arc<ScriptedTransport>) -> ResourceStore<PumpModel> {
        transport.push_json(
            200,
            ok(json!([model(1, "A", "Alaris"), model(2, "B", "Braun"), model(3, "C", "Carefusion")])),
        );
        let store = store(transport);
        store.fetch_all().await;
        store
    }

    fn codes(state: &CollectionState<PumpModel>) -> Vec<String> {
        state.items.iter().map(|m| m.code.clone()).collect()
    }

    #[tokio::test]
    async fn fetch_all_is_idempotent() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;
        let first = store.snapshot();

        transport.push_json(
            200,
            ok(json!([model(1, "A", "Alaris"), model(2, "B", "Braun"), model(3, "C", "Carefusion")])),
        );
        store.fetch_all().await;
        let second = store.snapshot();

        let first: Vec<PumpModel> = first.items.iter().map(|m| (**m).clone()).collect();
        let second: Vec<PumpModel> = second.items.iter().map(|m| (**m).clone()).collect();
        assert_eq!(first, second);
        assert_eq!(store.snapshot().status(), StoreStatus::Idle);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_stale_items() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;

        transport.push_json(500, json!({ "message": "Database unavailable" }));
        store.fetch_all().await;

        let state = store.snapshot();
        assert_eq!(codes(&state), vec!["A", "B", "C"]);
        assert_eq!(state.error.as_deref(), Some("Database unavailable"));
        assert!(!state.loading);

        store.clear_error();
        assert!(store.snapshot().error.is_none());
        assert_eq!(store.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn create_refetches_the_collection() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, ok(json!([model(1, "A", "One"), model(2, "B", "Two")])));
        let store = store(&transport);
        store.fetch_all().await;

        transport.push_json(201, ok(json!({ "id": 3 })));
        transport.push_json(
            200,
            ok(json!([model(1, "A", "One"), model(2, "B", "Two"), model(3, "C", "New")])),
        );
        let input = NewPumpModel {
            code: "C".into(),
            name: "New".into(),
            manufacturer: "Acme".into(),
        };

        let id = store.create(&input).await.unwrap();
        assert_eq!(id, Some(3));

        let state = store.snapshot();
        assert_eq!(state.items.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(state.items[2].name, "New");
        assert!(!state.loading);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].url, "http://api.test/models");
    }

    #[tokio::test]
    async fn update_replaces_only_the_matching_item() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;
        let before = store.snapshot();

        transport.push_json(200, ok(model(2, "B", "Braun Space")));
        let patch = PumpModelPatch {
            name: Some("Braun Space".into()),
            ..PumpModelPatch::default()
        };
        let updated = store.update(2, &patch).await.unwrap();

        let after = store.snapshot();
        assert_eq!(codes(&after), vec!["A", "B", "C"]);
        assert!(Arc::ptr_eq(&before.items[0], &after.items[0]));
        assert!(Arc::ptr_eq(&before.items[2], &after.items[2]));
        assert!(Arc::ptr_eq(&updated, &after.items[1]));

        let old = before.items[1].as_ref();
        let new = after.items[1].as_ref();
        assert_eq!(new.name, "Braun Space");
        assert_eq!((old.id, &old.code, &old.manufacturer), (new.id, &new.code, &new.manufacturer));
        assert!(after.revision > before.revision);
    }

    #[tokio::test]
    async fn update_refreshes_selection() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;
        assert!(store.select(1));
        assert!(!store.select(99));
        assert!(store.snapshot().selected.is_none());
        assert!(store.select(1));

        transport.push_json(200, ok(model(1, "A", "Renamed")));
        store.update(1, &PumpModelPatch::default()).await.unwrap();

        let selected = store.snapshot().selected.unwrap();
        assert_eq!(selected.name, "Renamed");
    }

    #[tokio::test]
    async fn update_of_unloaded_record_leaves_collection_alone() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;
        let before = store.snapshot();

        transport.push_json(200, ok(model(42, "Z", "Elsewhere")));
        store.update(42, &PumpModelPatch::default()).await.unwrap();

        let after = store.snapshot();
        assert_eq!(after.revision, before.revision);
        assert!(before.items.iter().zip(&after.items).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[tokio::test]
    async fn rejected_update_records_message_and_keeps_items() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;
        let before = store.snapshot();

        transport.push_json(200, json!({ "success": false, "message": "X" }));
        let err = store.update(1, &PumpModelPatch::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "X");

        let after = store.snapshot();
        assert_eq!(after.error.as_deref(), Some("X"));
        assert_eq!(after.status(), StoreStatus::Error);
        assert!(before.items.iter().zip(&after.items).all(|(a, b)| Arc::ptr_eq(a, b)));
        assert_eq!(after.items.len(), before.items.len());
    }

    #[tokio::test]
    async fn rejected_fetch_with_object_data_surfaces_message() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;

        transport.push_json(200, json!({ "success": false, "message": "X", "data": {} }));
        store.fetch_all().await;

        let state = store.snapshot();
        assert_eq!(state.error.as_deref(), Some("X"));
        assert_eq!(state.items.len(), 3);
    }

    #[tokio::test]
    async fn delete_removes_one_item_and_keeps_order() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;
        store.select(2);

        transport.push_json(200, json!({ "success": true }));
        store.delete(2).await.unwrap();

        let state = store.snapshot();
        assert_eq!(codes(&state), vec!["A", "C"]);
        assert!(state.selected.is_none());
    }

    #[tokio::test]
    async fn failed_delete_is_rethrown() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;

        transport.push_error("connection reset");
        assert!(store.delete(1).await.is_err());

        let state = store.snapshot();
        assert_eq!(state.error.as_deref(), Some("connection reset"));
        assert_eq!(state.len(), 3);
    }

    #[tokio::test]
    async fn last_response_to_land_wins() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(loaded(&transport).await);

        let first_gate = transport.push_gated_json(200, ok(model(1, "A", "First")));
        let second_gate = transport.push_gated_json(200, ok(model(1, "A", "Second")));

        let first = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.update(1, &PumpModelPatch::default()).await }
        });
        while transport.requests().len() < 2 {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.update(1, &PumpModelPatch::default()).await }
        });
        while transport.requests().len() < 3 {
            tokio::task::yield_now().await;
        }

        second_gate.send(()).unwrap();
        assert_eq!(second.await.unwrap().unwrap().name, "Second");
        assert_eq!(store.get(1).unwrap().name, "Second");

        first_gate.send(()).unwrap();
        assert_eq!(first.await.unwrap().unwrap().name, "First");

        let state = store.snapshot();
        assert_eq!(state.get(1).unwrap().name, "First");
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn filtered_follows_term_and_items() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;

        assert_eq!(store.filtered().filtered, 3);
        store.set_search_term("br");
        let view = store.filtered();
        assert_eq!(view.summary(), "Showing 1 of 3");

        transport.push_json(200, json!({ "success": true }));
        store.delete(2).await.unwrap();
        assert_eq!(store.filtered().summary(), "Showing 0 of 2");
    }

    #[tokio::test]
    async fn persisted_items_hydrate_a_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let backend: Arc<dyn SnapshotStore> = Arc::new(JsonSnapshotStore::new(dir.path()).unwrap());

        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, ok(json!([model(1, "A", "Alaris"), model(2, "B", "Braun")])));
        let first = store(&transport).with_persistence(Arc::clone(&backend), 1);
        first.fetch_all().await;

        let hydrated = store(&transport).with_persistence(Arc::clone(&backend), 1);
        assert_eq!(codes(&hydrated.snapshot()), vec!["A", "B"]);

        let stale = store(&transport).with_persistence(Arc::clone(&backend), 2);
        assert!(stale.snapshot().is_empty());

        hydrated.reset();
        let after_reset = store(&transport).with_persistence(backend, 1);
        assert!(after_reset.snapshot().is_empty());
    }

    #[tokio::test]
    async fn reset_empties_state() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = loaded(&transport).await;
        store.set_search_term("a");
        store.select(1);
        let revision = store.snapshot().revision;

        store.reset();

        let state = store.snapshot();
        assert!(state.is_empty());
        assert!(state.selected.is_none());
        assert!(state.search_term.is_empty());
        assert!(state.revision > revision);
        assert_eq!(store.name(), "models");
    }
}
