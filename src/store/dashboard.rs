//! Dashboard summary, refreshed through a latest-request-wins slot.

use crate::client::{ApiClient, FetchState, LatestFetch};
use crate::domain::DashboardSummary;

const SUMMARY_PATH: &str = "dashboard/summary";

/// Read-only aggregate view of the inventory.
///
/// Repeated refreshes abort the one still in flight, so a slow earlier response
/// can never overwrite a newer one.
#[derive(Debug)]
pub struct DashboardStore {
    api: ApiClient,
    fetch: LatestFetch<DashboardSummary>,
}

impl DashboardStore {
    /// Creates an empty dashboard over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            fetch: LatestFetch::new(),
        }
    }

    /// Fetches `GET /dashboard/summary`. Returns `true` if this request's outcome
    /// landed, `false` if it was superseded or cancelled.
    pub async fn refresh(&self) -> bool {
        let api = self.api.clone();
        self.fetch
            .fetch(async move {
                let summary: Option<DashboardSummary> = api.get(SUMMARY_PATH).await?;
                Ok(summary.unwrap_or_default())
            })
            .await
    }

    /// Last landed summary with its loading and error flags.
    #[must_use]
    pub fn snapshot(&self) -> FetchState<DashboardSummary> {
        self.fetch.snapshot()
    }

    /// Aborts a refresh in flight. The last summary stays visible.
    pub fn cancel(&self) {
        self.fetch.cancel();
    }

    /// Aborts a refresh in flight and drops the last summary.
    pub fn reset(&self) {
        self.fetch.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use crate::client::Credentials;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn refresh_loads_summary() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            json!({ "success": true, "data": {
                "total_pumps": 4,
                "by_status": { "available": 3, "maintenance": 1 },
                "by_institution": { "CHU Nord": 4 }
            } }),
        );
        let credentials = Credentials::in_memory();
        credentials.set_token("t0k");
        let store = DashboardStore::new(ApiClient::new("http://api.test", transport.clone(), credentials));

        assert!(store.refresh().await);

        let state = store.snapshot();
        let summary = state.data.unwrap();
        assert_eq!(summary.total_pumps, 4);
        assert_eq!(summary.by_status["available"], 3);

        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://api.test/dashboard/summary");
        assert_eq!(request.header("authorization"), Some("Bearer t0k"));
    }

    #[tokio::test]
    async fn superseded_refresh_never_lands() {
        let transport = Arc::new(ScriptedTransport::new());
        let slow = transport.push_gated_json(200, json!({ "success": true, "data": { "total_pumps": 1 } }));
        transport.push_json(200, json!({ "success": true, "data": { "total_pumps": 2 } }));
        let store = Arc::new(DashboardStore::new(ApiClient::new(
            "http://api.test",
            transport.clone(),
            Credentials::in_memory(),
        )));

        let first = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.refresh().await }
        });
        while transport.requests().is_empty() {
            tokio::task::yield_now().await;
        }

        assert!(store.refresh().await);
        let _ = slow.send(());
        assert!(!first.await.unwrap());
        assert_eq!(store.snapshot().data.unwrap().total_pumps, 2);
    }
}
