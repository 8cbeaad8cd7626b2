//! Reference catalogs (institutions and services).
//!
//! The two catalogs are independent endpoints but screens always need both, so
//! [`Catalogs::load_all`] fetches them concurrently and treats the pair as one
//! unit: if either request fails, neither store is touched except for `error`.

use crate::client::ApiClient;
use crate::client::ResourceClient;
use crate::domain::error::Result;
use crate::domain::{Institution, ItemId, Service};
use crate::store::resource_store::ResourceStore;
use futures_util::future::try_join;
use std::sync::Arc;
use tracing::Instrument;

/// Institution and service stores loaded together.
#[derive(Debug)]
pub struct Catalogs {
    pub institutions: ResourceStore<Institution>,
    pub services: ResourceStore<Service>,
}

impl Catalogs {
    /// Creates empty institution and service stores over `api`.
    #[must_use]
    pub fn new(api: &ApiClient) -> Self {
        Self {
            institutions: ResourceStore::new(ResourceClient::new(api.clone())),
            services: ResourceStore::new(ResourceClient::new(api.clone())),
        }
    }

    /// Wraps already configured stores, e.g. ones with persistence attached.
    #[must_use]
    pub const fn from_stores(
        institutions: ResourceStore<Institution>,
        services: ResourceStore<Service>,
    ) -> Self {
        Self {
            institutions,
            services,
        }
    }

    /// Fetches both catalogs concurrently.
    ///
    /// On success both stores are replaced. On failure the error is recorded on
    /// both stores, their items are kept, and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first failure of either request.
    pub async fn load_all(&self) -> Result<()> {
        let span = tracing::debug_span!("catalogs_load_all");
        async {
            self.institutions.begin();
            self.services.begin();

            let joined = try_join(
                self.institutions.client().list(),
                self.services.client().list(),
            )
            .await;

            match joined {
                Ok((institutions, services)) => {
                    self.institutions.land_fetched(institutions);
                    self.services.land_fetched(services);
                    Ok(())
                }
                Err(e) => {
                    self.institutions.fail("load_all", &e);
                    self.services.fail("load_all", &e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Services belonging to `institution_id`, in catalog order.
    #[must_use]
    pub fn services_of(&self, institution_id: ItemId) -> Vec<Arc<Service>> {
        self.services
            .snapshot()
            .items
            .into_iter()
            .filter(|service| service.institution_id == institution_id)
            .collect()
    }

    /// Display name of an institution, if loaded.
    #[must_use]
    pub fn institution_name(&self, id: ItemId) -> Option<String> {
        self.institutions.get(id).map(|i| i.name.clone())
    }

    /// Empties both catalogs and their snapshots.
    pub fn reset(&self) {
        self.institutions.reset();
        self.services.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use crate::client::Credentials;
    use serde_json::json;

    fn catalogs(transport: &Arc<ScriptedTransport>) -> Catalogs {
        Catalogs::new(&ApiClient::new("http://api.test", transport.clone(), Credentials::in_memory()))
    }

    #[tokio::test]
    async fn loads_both_catalogs() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            json!({ "success": true, "data": [{ "id": 1, "code": "CHU", "name": "CHU Nord" }] }),
        );
        transport.push_json(
            200,
            json!({ "success": true, "data": [
                { "id": 10, "code": "REA", "name": "Reanimation", "institution_id": 1 },
                { "id": 11, "code": "ONC", "name": "Oncology", "institution_id": 2 }
            ] }),
        );
        let catalogs = catalogs(&transport);

        catalogs.load_all().await.unwrap();

        assert_eq!(catalogs.institution_name(1).as_deref(), Some("CHU Nord"));
        let services = catalogs.services_of(1);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].code, "REA");
        assert!(!catalogs.services.snapshot().loading);

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert!(urls.contains(&"http://api.test/institutions".to_string()));
        assert!(urls.contains(&"http://api.test/services".to_string()));
    }

    #[tokio::test]
    async fn one_failure_fails_the_whole_join() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            json!({ "success": true, "data": [{ "id": 1, "code": "CHU", "name": "CHU Nord" }] }),
        );
        transport.push_json(503, json!({ "error": "Service catalog offline" }));
        let catalogs = catalogs(&transport);

        let err = catalogs.load_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Service catalog offline");

        for state in [
            catalogs.institutions.snapshot().error,
            catalogs.services.snapshot().error,
        ] {
            assert_eq!(state.as_deref(), Some("Service catalog offline"));
        }
        assert!(catalogs.institutions.snapshot().is_empty());
        assert!(!catalogs.institutions.snapshot().loading);
    }
}
