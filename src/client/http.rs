//! `reqwest`-backed [`Transport`] implementation.

use super::transport::{ApiRequest, Method, RawResponse, Transport};
use crate::domain::error::{InventoryError, Result};
use futures_util::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;

/// Sends requests over HTTP(S) with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built (for example
    /// when the TLS backend fails to initialize).
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pump-inventory/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InventoryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    const fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<RawResponse>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(Self::method(request.method), &request.url);

            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status();
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            let body = response.text().await?;

            tracing::trace!(status = status.as_u16(), body_len = body.len(), "response received");

            Ok(RawResponse {
                status: status.as_u16(),
                status_text,
                body,
            })
        })
    }
}
