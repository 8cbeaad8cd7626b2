//! Typed CRUD access to one REST collection.

use super::api::ApiClient;
use crate::domain::error::{InventoryError, Result};
use crate::domain::{ItemId, Resource};
use std::marker::PhantomData;

/// CRUD client for the collection served at `/<T::ENDPOINT>`.
///
/// Each method performs exactly one request (`update` may perform a second `GET`
/// when the server omits the updated record).
pub struct ResourceClient<T: Resource> {
    api: ApiClient,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> std::fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("endpoint", &T::ENDPOINT)
            .finish_non_exhaustive()
    }
}

impl<T: Resource> ResourceClient<T> {
    /// Creates a client for `/<T::ENDPOINT>` over `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    fn item_path(id: ItemId) -> String {
        format!("{}/{id}", T::ENDPOINT)
    }

    /// `GET /<resource>`. A missing `data` field yields an empty list.
    ///
    /// # Errors
    ///
    /// Propagates any request failure.
    pub async fn list(&self) -> Result<Vec<T>> {
        let items: Option<Vec<T>> = self.api.get(T::ENDPOINT).await?;
        Ok(items.unwrap_or_default())
    }

    /// `GET /<resource>/:id`.
    ///
    /// # Errors
    ///
    /// Propagates any request failure.
    pub async fn get(&self, id: ItemId) -> Result<Option<T>> {
        self.api.get(&Self::item_path(id)).await
    }

    /// `POST /<resource>`, returning the server-assigned id when reported.
    ///
    /// # Errors
    ///
    /// Propagates any request failure.
    pub async fn create(&self, input: &T::Create) -> Result<Option<ItemId>> {
        let data: Option<serde_json::Value> = self.api.post(T::ENDPOINT, input).await?;
        let id = data.as_ref().and_then(|d| d.get("id")).and_then(serde_json::Value::as_i64);
        if id.is_none() {
            tracing::debug!(endpoint = T::ENDPOINT, "create response carried no id");
        }
        Ok(id)
    }

    /// `PATCH /<resource>/:id`, returning the updated record.
    ///
    /// # Errors
    ///
    /// Propagates any request failure. Returns
    /// [`InventoryError::InvalidResponse`] if the server neither returns the record
    /// nor serves it on a follow-up `GET`.
    pub async fn update(&self, id: ItemId, patch: &T::Patch) -> Result<T> {
        let path = Self::item_path(id);
        if let Some(record) = self.api.patch::<_, T>(&path, patch).await? {
            return Ok(record);
        }

        tracing::debug!(endpoint = T::ENDPOINT, id, "update response carried no record, re-reading");
        self.get(id).await?.ok_or_else(InventoryError::invalid_response)
    }

    /// `DELETE /<resource>/:id`.
    ///
    /// # Errors
    ///
    /// Propagates any request failure.
    pub async fn delete(&self, id: ItemId) -> Result<()> {
        let _: Option<serde_json::Value> = self.api.delete(&Self::item_path(id)).await?;
        Ok(())
    }
}
