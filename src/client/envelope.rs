//! The `{success, data, message, error}` response envelope.
//!
//! Every endpoint of the inventory service wraps its payload in an [`Envelope`].
//! [`decode`] turns a [`RawResponse`] into either the unwrapped `data` or an
//! [`InventoryError`] carrying the one message a user should see.

use super::transport::RawResponse;
use crate::domain::error::{InventoryError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Wire contract wrapping every response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

const fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Failed envelope carrying a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }
}

/// Error fields of an envelope, read without caring about `data`.
#[derive(Debug, Default, Deserialize)]
struct ErrorFields {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Resolves the message for a non-2xx response.
///
/// `message` and `error` are joined as `"<message>: <error>"` when both are present
/// and different; a single present field is used as is; otherwise the status line
/// is reported as `"HTTP <status>: <status text>"`.
#[must_use]
pub fn status_failure_message(response: &RawResponse) -> String {
    let fields = serde_json::from_str::<ErrorFields>(&response.body).unwrap_or_default();

    match (non_blank(fields.message), non_blank(fields.error)) {
        (Some(message), Some(error)) if message != error => format!("{message}: {error}"),
        (Some(message), _) => message,
        (None, Some(error)) => error,
        (None, None) => format!("HTTP {}: {}", response.status, response.status_text),
    }
}

/// Decodes a raw response into its `data` payload.
///
/// Returns `Ok(None)` when the envelope is successful but carries no `data`.
///
/// # Errors
///
/// - [`InventoryError::Http`] for non-2xx statuses
/// - [`InventoryError::Envelope`] for `success: false`
/// - [`InventoryError::InvalidResponse`] when a 2xx body is not a valid envelope
pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<Option<T>> {
    if !response.is_success() {
        let message = status_failure_message(response);
        tracing::debug!(status = response.status, message = %message, "request rejected");
        return Err(InventoryError::Http {
            status: response.status,
            message,
        });
    }

    // `data` is typed only once `success` is known to be true.
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(&response.body).map_err(|e| {
        tracing::debug!(error = %e, status = response.status, "failed to parse envelope");
        InventoryError::invalid_response()
    })?;

    if !envelope.success {
        let message = non_blank(envelope.message)
            .or_else(|| non_blank(envelope.error))
            .unwrap_or_else(|| crate::domain::error::INVALID_RESPONSE_MESSAGE.to_string());
        tracing::debug!(message = %message, "envelope reported failure");
        return Err(InventoryError::Envelope(message));
    }

    envelope
        .data
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| {
            tracing::debug!(error = %e, "envelope data has an unexpected shape");
            InventoryError::invalid_response()
        })
}
