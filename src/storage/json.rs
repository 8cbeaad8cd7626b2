//! JSON file snapshot backend.
//!
//! Each store gets its own human-readable file, `<dir>/<name>.json`. Writes go to
//! a temporary file first and are then renamed over the target, so a crash never
//! leaves a half-written snapshot behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "name": "pumps",
//!   "version": 1,
//!   "saved_at": 1767225600,
//!   "items": [
//!     { "id": 1, "serial_number": "SN-001", "status": "available", ... }
//!   ]
//! }
//! ```

use crate::domain::error::{InventoryError, Result};
use crate::storage::backend::SnapshotStore;
use crate::storage::models::Snapshot;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Directory of per-store JSON snapshots.
#[derive(Debug)]
pub struct JsonSnapshotStore {
    dir: PathBuf,

    /// Serializes writers sharing this backend.
    write_lock: Mutex<()>,
}

impl JsonSnapshotStore {
    /// Opens (and creates, if needed) the snapshot directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tracing::debug!(dir = ?dir, "initializing snapshot storage");
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the snapshot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `name`.
    ///
    /// Anything outside `[A-Za-z0-9_-]` is replaced so a name can never escape the
    /// directory.
    fn file_path(&self, name: &str) -> PathBuf {
        let safe: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self, name: &str) -> Result<Option<Snapshot>> {
        let path = self.file_path(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!(name, "no snapshot on disk");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&contents)
            .map_err(|e| InventoryError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(name, version = snapshot.version, "loaded snapshot");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.file_path(&snapshot.name);

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| InventoryError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = path.with_extension("json.tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!(name = %snapshot.name, "snapshot saved");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match std::fs::remove_file(self.file_path(name)) {
            Ok(()) => {
                tracing::debug!(name, "snapshot removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::{load_items, save_items};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path()).unwrap();
        assert!(store.load("pumps").unwrap().is_none());
        store.remove("pumps").unwrap();
    }

    #[test]
    fn saved_items_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![Arc::new(json!({ "id": 1 })), Arc::new(json!({ "id": 2 }))];
        {
            let store = JsonSnapshotStore::new(dir.path()).unwrap();
            save_items(&store, "models", 1, &items).unwrap();
        }

        let store = JsonSnapshotStore::new(dir.path()).unwrap();
        let loaded: Vec<serde_json::Value> = load_items(&store, "models", 1).unwrap().unwrap();
        assert_eq!(loaded, vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        assert!(!dir.path().join("models.json.tmp").exists());
    }

    #[test]
    fn version_mismatch_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path()).unwrap();
        save_items(&store, "pumps", 1, &[Arc::new(json!({ "id": 1 }))]).unwrap();

        let loaded: Option<Vec<serde_json::Value>> = load_items(&store, "pumps", 2).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pumps.json"), "{not json").unwrap();
        let store = JsonSnapshotStore::new(dir.path()).unwrap();

        let err = store.load("pumps").unwrap_err();
        assert!(matches!(err, InventoryError::Storage(_)));
    }

    #[test]
    fn names_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path()).unwrap();
        store.save(&Snapshot::new("../evil", 1, json!([]))).unwrap();

        assert!(dir.path().join("___evil.json").exists());
        store.remove("../evil").unwrap();
        assert!(!dir.path().join("___evil.json").exists());
    }
}
