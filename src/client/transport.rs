//! Transport abstraction between the API client and the network.
//!
//! The [`Transport`] trait is the seam that lets the envelope handling in
//! [`crate::client::ApiClient`] run against a real HTTP stack
//! ([`crate::client::HttpTransport`]) or against scripted responses in tests.

use crate::domain::error::Result;
use futures_util::future::BoxFuture;
use std::fmt;

/// HTTP verbs used by the inventory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case verb as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body, if any.
    pub body: Option<String>,
}

impl ApiRequest {
    /// Returns the first header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The raw outcome of a request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase for `status` (may be empty).
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends requests and returns raw responses.
///
/// Implementations return `Err` only when no response was received at all
/// (network failure). Non-2xx statuses are *responses*, not errors, at this layer.
pub trait Transport: Send + Sync {
    /// Sends one request. Exactly one attempt is made.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InventoryError::Transport`] if the request could not be
    /// delivered or the response body could not be read.
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<RawResponse>>;
}
