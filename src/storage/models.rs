//! Snapshot record persisted for each store.
//!
//! Items are kept as raw JSON at this layer so one backend can hold snapshots of
//! every record type. Typed conversion happens in [`crate::storage::backend`].

use serde::{Deserialize, Serialize};

/// One persisted collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Store name the snapshot belongs to (e.g. `"pumps"`).
    pub name: String,

    /// Schema version the items were written with.
    pub version: u32,

    /// Unix timestamp of the write.
    pub saved_at: i64,

    /// Serialized items, always a JSON array.
    #[serde(default = "empty_items")]
    pub items: serde_json::Value,
}

fn empty_items() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

impl Snapshot {
    /// Creates a snapshot stamped with the current time.
    pub fn new(name: impl Into<String>, version: u32, items: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            version,
            saved_at: chrono::Utc::now().timestamp(),
            items,
        }
    }
}
