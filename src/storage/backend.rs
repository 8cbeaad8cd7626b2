//! Snapshot backend abstraction.
//!
//! Stores persist their items through [`SnapshotStore`] so the backend can be
//! swapped without touching store logic. The trait only knows raw JSON snapshots;
//! [`load_items`] and [`save_items`] handle the typed conversion and the schema
//! version check.

use crate::domain::error::{InventoryError, Result};
use crate::storage::models::Snapshot;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Persistent home for per-store snapshots.
///
/// # Implementations
///
/// - [`JsonSnapshotStore`](crate::storage::JsonSnapshotStore): one JSON file per
///   store with atomic writes
pub trait SnapshotStore: Send + Sync {
    /// Reads the snapshot saved under `name`.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or parsed.
    fn load(&self, name: &str) -> Result<Option<Snapshot>>;

    /// Replaces the snapshot saved under `snapshot.name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Forgets the snapshot saved under `name`. Removing a missing snapshot is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be removed.
    fn remove(&self, name: &str) -> Result<()>;
}

/// Loads the typed items saved under `name`.
///
/// Returns `Ok(None)` when no snapshot exists or when it was written with a
/// different schema `version`; stale snapshots are discarded rather than migrated.
///
/// # Errors
///
/// Returns an error if the backend fails or the items no longer match `T`.
pub fn load_items<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    name: &str,
    version: u32,
) -> Result<Option<Vec<T>>> {
    let Some(snapshot) = store.load(name)? else {
        return Ok(None);
    };

    if snapshot.version != version {
        tracing::debug!(
            name,
            stored = snapshot.version,
            expected = version,
            "discarding snapshot with mismatched version"
        );
        return Ok(None);
    }

    let items = serde_json::from_value(snapshot.items)
        .map_err(|e| InventoryError::Storage(format!("failed to decode {name} snapshot: {e}")))?;
    Ok(Some(items))
}

/// Saves `items` under `name`, stamped with `version`.
///
/// # Errors
///
/// Returns an error if serialization or the backend write fails.
pub fn save_items<T: Serialize>(
    store: &dyn SnapshotStore,
    name: &str,
    version: u32,
    items: &[Arc<T>],
) -> Result<()> {
    let items: Vec<&T> = items.iter().map(Arc::as_ref).collect();
    let items = serde_json::to_value(items)
        .map_err(|e| InventoryError::Storage(format!("failed to encode {name} snapshot: {e}")))?;
    store.save(&Snapshot::new(name, version, items))
}
