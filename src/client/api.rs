//! Envelope-aware API client.
//!
//! [`ApiClient`] resolves paths against the base URL, attaches the JSON and bearer
//! headers, sends through a [`Transport`] and decodes the envelope. It is the only
//! place that turns wire failures into [`crate::InventoryError`] values.

use super::credentials::Credentials;
use super::envelope;
use super::transport::{ApiRequest, Method, Transport};
use crate::domain::error::{InventoryError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;

/// Cloneable client for the inventory REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `https://inventory.example.org/api`).
    #[must_use]
    pub fn new(base_url: &str, transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            transport,
            credentials,
        }
    }

    /// Credentials consulted on every request.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Absolute URL for a path relative to the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends one request and unwraps the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-2xx statuses, `success: false`
    /// envelopes and unparseable bodies. No retry is attempted.
    pub async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let span = tracing::debug_span!("api_request", method = %method, url = %url);

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| InventoryError::Encode(e.to_string()))?;

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = self.credentials.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let request = ApiRequest {
            method,
            url,
            headers,
            body,
        };

        async move {
            let response = self.transport.send(request).await.map_err(|e| {
                tracing::debug!(error = %e, "transport failure");
                e
            })?;

            tracing::debug!(status = response.status, "response received");
            envelope::decode(&response)
        }
        .instrument(span)
        .await
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.request::<(), T>(Method::Get, path, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<Option<T>> {
        self.request(Method::Post, path, Some(body)).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<Option<T>> {
        self.request(Method::Patch, path, Some(body)).await
    }

    /// `DELETE path` without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.request::<(), T>(Method::Delete, path, None).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn attaches_json_and_bearer_headers_read_at_call_time() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({ "success": true, "data": 1 }));
        transport.push_json(200, json!({ "success": true, "data": 2 }));

        let credentials = Credentials::in_memory();
        let client = ApiClient::new("http://api.test/", transport.clone(), credentials.clone());

        let first: Option<i32> = client.get("pumps").await.unwrap();
        assert_eq!(first, Some(1));

        credentials.set_token("t0k");
        let second: Option<i32> = client.get("/pumps").await.unwrap();
        assert_eq!(second, Some(2));

        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://api.test/pumps");
        assert_eq!(requests[0].header("content-type"), Some("application/json"));
        assert_eq!(requests[0].header("authorization"), None);
        assert_eq!(requests[1].header("Authorization"), Some("Bearer t0k"));
    }

    #[tokio::test]
    async fn serializes_body_for_post() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({ "success": true, "data": { "id": 3 } }));
        let client = ApiClient::new("http://api.test", transport.clone(), Credentials::in_memory());

        let _: Option<serde_json::Value> = client.post("models", &json!({ "code": "C" })).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body.as_deref(), Some(r#"{"code":"C"}"#));
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced_once() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_error("connection refused");
        let client = ApiClient::new("http://api.test", transport.clone(), Credentials::in_memory());

        let err = client.get::<i32>("pumps").await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(transport.requests().len(), 1);
    }
}
