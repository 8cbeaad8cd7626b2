//! Traits shared by every addressable collection item.
//!
//! A [`Resource`] ties a record type to its REST endpoint and to the bodies used to
//! create and patch it. [`Searchable`] exposes the string fields the search overlay
//! matches against.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Stable numeric identifier assigned by the server.
pub type ItemId = i64;

/// A record that lives in a server-side collection.
///
/// Identity is the id; every other field is mutable. Implementations describe where
/// the collection lives (`ENDPOINT`) and which bodies the server accepts.
///
/// # Examples
///
/// ```
/// use pump_inventory::domain::{Resource, PumpModel};
///
/// assert_eq!(PumpModel::ENDPOINT, "models");
/// ```
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Path segment of the collection, without slashes (e.g. `"pumps"`).
    const ENDPOINT: &'static str;

    /// Body sent with `POST /<endpoint>`.
    type Create: Serialize + Send + Sync;

    /// Partial body sent with `PATCH /<endpoint>/:id`.
    type Patch: Serialize + Send + Sync;

    /// Returns the server-assigned identifier.
    fn id(&self) -> ItemId;
}

/// A record that can be matched by a free-text search term.
pub trait Searchable {
    /// Returns the fields a search term is matched against.
    fn search_fields(&self) -> Vec<&str>;
}
