//! Stateful stores that mirror server collections in memory.
//!
//! # Modules
//!
//! - `state`: collection state and derived status
//! - `resource_store`: generic CRUD store for one collection
//! - `catalogs`: institutions and services loaded as a pair
//! - `dashboard`: summary aggregates behind a latest-wins fetch
//! - `auth`: login flow feeding the shared credentials

pub mod auth;
pub mod catalogs;
pub mod dashboard;
pub mod resource_store;
pub mod state;

pub use auth::{AuthState, AuthStore};
pub use catalogs::Catalogs;
pub use dashboard::DashboardStore;
pub use resource_store::ResourceStore;
pub use state::{CollectionState, StoreStatus};
