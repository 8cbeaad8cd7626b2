//! Resource client layer.
//!
//! Everything that talks to the inventory service lives here: the transport seam,
//! the envelope decoder, the shared credentials and the typed per-collection
//! clients. Layers above only ever see decoded payloads or an
//! [`InventoryError`](crate::InventoryError).
//!
//! # Modules
//!
//! - `transport`: `Transport` trait and request/response types
//! - `http`: `reqwest` implementation of the transport
//! - `envelope`: `{success, data, message, error}` decoding rules
//! - `credentials`: shared bearer-token slot, optionally persisted
//! - `api`: envelope-aware client with JSON and auth headers
//! - `resource`: typed CRUD client for one collection
//! - `fetcher`: cancellable latest-request-wins fetch slot

pub mod api;
pub mod credentials;
pub mod envelope;
pub mod fetcher;
pub mod http;
pub mod resource;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::ApiClient;
pub use credentials::Credentials;
pub use envelope::Envelope;
pub use fetcher::{FetchState, LatestFetch};
pub use http::HttpTransport;
pub use resource::ResourceClient;
pub use transport::{ApiRequest, Method, RawResponse, Transport};
