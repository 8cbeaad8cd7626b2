//! Pump inventory records.
//!
//! A [`Pump`] is one physical infusion pump tracked by serial number and inventory
//! code, assigned to an institution and a service, and carrying a lifecycle
//! [`PumpStatus`].

use super::resource::{ItemId, Resource, Searchable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpStatus {
    /// In stock and ready to be assigned.
    Available,
    /// Currently attached to a patient or deployed on a ward.
    InUse,
    /// Out of service for calibration or repair.
    Maintenance,
    /// Permanently withdrawn from the inventory.
    Decommissioned,
}

impl PumpStatus {
    /// Wire value of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
            Self::Decommissioned => "decommissioned",
        }
    }

    /// Parses the wire value, accepting `-` in place of `_`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "available" => Some(Self::Available),
            "in_use" => Some(Self::InUse),
            "maintenance" => Some(Self::Maintenance),
            "decommissioned" => Some(Self::Decommissioned),
            _ => None,
        }
    }
}

impl fmt::Display for PumpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked infusion pump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pump {
    pub id: ItemId,
    pub serial_number: String,
    pub inventory_code: String,
    pub model_id: ItemId,
    pub institution_id: Option<ItemId>,
    pub service_id: Option<ItemId>,
    pub status: PumpStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields accepted by `POST /pumps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPump {
    pub serial_number: String,
    pub inventory_code: String,
    pub model_id: ItemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ItemId>,
    pub status: PumpStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update accepted by `PATCH /pumps/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PumpStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PumpPatch {
    /// Patch that only changes the status.
    #[must_use]
    pub fn status(status: PumpStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Resource for Pump {
    const ENDPOINT: &'static str = "pumps";
    type Create = NewPump;
    type Patch = PumpPatch;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl Searchable for Pump {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.serial_number.as_str(),
            self.inventory_code.as_str(),
            self.status.as_str(),
        ];
        if let Some(notes) = &self.notes {
            fields.push(notes);
        }
        fields
    }
}
