//! Local snapshot persistence for resource stores.
//!
//! Stores can optionally hydrate from, and write through to, a snapshot of their
//! last known items so a restarted client has something to show before the first
//! fetch lands. Persistence is best effort: failures are logged by the stores and
//! never surface to callers.
//!
//! # Modules
//!
//! - `backend`: `SnapshotStore` trait plus typed load/save helpers
//! - `json`: one-file-per-store JSON backend with atomic writes
//! - `models`: snapshot record format

pub mod backend;
pub mod json;
pub mod models;

pub use backend::{load_items, save_items, SnapshotStore};
pub use json::JsonSnapshotStore;
pub use models::Snapshot;
