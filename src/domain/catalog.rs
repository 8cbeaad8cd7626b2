//! Catalog records: institutions and the services inside them.
//!
//! Catalogs are small reference collections that pump screens load together,
//! see [`crate::store::Catalogs`].

use super::resource::{ItemId, Resource, Searchable};
use serde::{Deserialize, Serialize};

/// A hospital or clinic that owns pumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub id: ItemId,
    pub code: String,
    pub name: String,
}

/// Fields accepted by `POST /institutions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstitution {
    pub code: String,
    pub name: String,
}

/// Partial update accepted by `PATCH /institutions/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Resource for Institution {
    const ENDPOINT: &'static str = "institutions";
    type Create = NewInstitution;
    type Patch = InstitutionPatch;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl Searchable for Institution {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

/// A clinical service (ward, unit) within an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub institution_id: ItemId,
}

/// Fields accepted by `POST /services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub code: String,
    pub name: String,
    pub institution_id: ItemId,
}

/// Partial update accepted by `PATCH /services/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<ItemId>,
}

impl Resource for Service {
    const ENDPOINT: &'static str = "services";
    type Create = NewService;
    type Patch = ServicePatch;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl Searchable for Service {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}
