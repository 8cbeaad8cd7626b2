//! Pump model catalog records.

use super::resource::{ItemId, Resource, Searchable};
use serde::{Deserialize, Serialize};

/// A pump make/model that individual pumps reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpModel {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
}

/// Fields accepted by `POST /models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPumpModel {
    pub code: String,
    pub name: String,
    pub manufacturer: String,
}

/// Partial update accepted by `PATCH /models/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpModelPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl Resource for PumpModel {
    const ENDPOINT: &'static str = "models";
    type Create = NewPumpModel;
    type Patch = PumpModelPatch;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl Searchable for PumpModel {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str(), self.manufacturer.as_str()]
    }
}
