//! Per-screen action hook with self-expiring feedback messages.
//!
//! An [`ActionHook`] drives one store's mutations for a screen and keeps its own
//! `{loading_action, error_action, success}` state, separate from the store's
//! `loading`/`error`. Errors never escape: they become `error_action` and the
//! caller gets `None`/`false` back.
//!
//! Messages clear themselves after a TTL through a spawned tokio task. Starting a
//! new action or dropping the hook aborts the pending clear, and a generation
//! counter makes sure a timer that slipped through can never clear a newer message.

use crate::domain::{ItemId, Resource};
use crate::store::ResourceStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;

/// How long feedback messages stay visible unless a screen overrides it.
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Shown when a failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Canned success messages for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMessages {
    pub created: String,
    pub updated: String,
    pub deleted: String,
}

impl Default for ActionMessages {
    fn default() -> Self {
        Self {
            created: "Created successfully".to_string(),
            updated: "Updated successfully".to_string(),
            deleted: "Deleted successfully".to_string(),
        }
    }
}

impl ActionMessages {
    /// Messages naming the record kind, e.g. `"Pump created successfully"`.
    #[must_use]
    pub fn for_kind(kind: &str) -> Self {
        Self {
            created: format!("{kind} created successfully"),
            updated: format!("{kind} updated successfully"),
            deleted: format!("{kind} deleted successfully"),
        }
    }
}

/// Transient state shown by the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    pub loading_action: bool,
    pub error_action: Option<String>,
    pub success: Option<String>,
}

/// Mutation wrapper for one screen.
pub struct ActionHook<T: Resource> {
    store: Arc<ResourceStore<T>>,
    messages: ActionMessages,
    ttl: Duration,
    state: Arc<Mutex<ActionState>>,
    generation: Arc<AtomicU64>,
    expiry: Mutex<Option<AbortHandle>>,
}

impl<T: Resource> std::fmt::Debug for ActionHook<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionHook")
            .field("store", &self.store.name())
            .field("ttl", &self.ttl)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl<T: Resource> ActionHook<T> {
    /// Creates a hook over `store` with generic messages and the default TTL.
    #[must_use]
    pub fn new(store: Arc<ResourceStore<T>>) -> Self {
        Self {
            store,
            messages: ActionMessages::default(),
            ttl: DEFAULT_MESSAGE_TTL,
            state: Arc::new(Mutex::new(ActionState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            expiry: Mutex::new(None),
        }
    }

    /// Replaces the success messages shown after each action.
    #[must_use]
    pub fn with_messages(mut self, messages: ActionMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Sets how long messages stay before they are cleared.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The wrapped store.
    #[must_use]
    pub fn store(&self) -> &Arc<ResourceStore<T>> {
        &self.store
    }

    /// Current action state.
    #[must_use]
    pub fn state(&self) -> ActionState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ActionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a record. Returns the new id, or `None` on failure.
    ///
    /// A create the server accepted without reporting an id also returns `None`;
    /// `success` tells the two apart.
    pub async fn create(&self, input: &T::Create) -> Option<ItemId> {
        self.start();
        match self.store.create(input).await {
            Ok(id) => {
                self.finish(Ok(self.messages.created.clone()));
                id
            }
            Err(e) => {
                self.finish(Err(e.to_string()));
                None
            }
        }
    }

    /// Updates a record. Returns the updated record, or `None` on failure.
    pub async fn update(&self, id: ItemId, patch: &T::Patch) -> Option<Arc<T>> {
        self.start();
        match self.store.update(id, patch).await {
            Ok(record) => {
                self.finish(Ok(self.messages.updated.clone()));
                Some(record)
            }
            Err(e) => {
                self.finish(Err(e.to_string()));
                None
            }
        }
    }

    /// Deletes a record. Returns `true` on success.
    pub async fn delete(&self, id: ItemId) -> bool {
        self.start();
        match self.store.delete(id).await {
            Ok(()) => {
                self.finish(Ok(self.messages.deleted.clone()));
                true
            }
            Err(e) => {
                self.finish(Err(e.to_string()));
                false
            }
        }
    }

    /// Clears both messages right away.
    pub fn dismiss(&self) {
        self.cancel_expiry();
        let mut state = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        state.error_action = None;
        state.success = None;
    }

    fn start(&self) {
        self.cancel_expiry();
        let mut state = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        state.loading_action = true;
        state.error_action = None;
        state.success = None;
    }

    fn finish(&self, outcome: std::result::Result<String, String>) {
        let generation = {
            let mut state = self.lock();
            state.loading_action = false;
            match outcome {
                Ok(message) => state.success = Some(message),
                Err(message) => {
                    tracing::debug!(store = %self.store.name(), error = %message, "action failed");
                    let message = if message.trim().is_empty() {
                        GENERIC_ERROR_MESSAGE.to_string()
                    } else {
                        message
                    };
                    state.error_action = Some(message);
                }
            }
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        self.schedule_clear(generation);
    }

    fn schedule_clear(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);
        let ttl = self.ttl;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if latest.load(Ordering::SeqCst) == generation {
                state.error_action = None;
                state.success = None;
                tracing::trace!(generation, "action messages expired");
            }
        });

        let previous = self
            .expiry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel_expiry(&self) {
        if let Some(handle) = self
            .expiry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl<T: Resource> Drop for ActionHook<T> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .expiry
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
