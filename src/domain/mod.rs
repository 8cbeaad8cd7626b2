//! Domain layer for the inventory client.
//!
//! This module contains the record types exchanged with the inventory service and
//! the traits that let stores and search treat them uniformly. Nothing here knows
//! about HTTP, persistence or rendering.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`resource`]: `Resource` and `Searchable` traits, `ItemId`
//! - [`pump`]: Pumps and their status
//! - [`model`]: Pump models
//! - [`catalog`]: Institutions and services
//! - [`dashboard`]: Dashboard summary and login payloads

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod pump;
pub mod resource;

pub use catalog::{Institution, InstitutionPatch, NewInstitution, NewService, Service, ServicePatch};
pub use dashboard::{DashboardSummary, LoginRequest, Session, User};
pub use error::{InventoryError, Result};
pub use model::{NewPumpModel, PumpModel, PumpModelPatch};
pub use pump::{NewPump, Pump, PumpPatch, PumpStatus};
pub use resource::{ItemId, Resource, Searchable};
