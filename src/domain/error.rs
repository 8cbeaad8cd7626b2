//! Error types for the inventory client.
//!
//! This module defines the centralized error type [`InventoryError`] and a type alias
//! [`Result`] used from the transport boundary up to the stores. Every variant renders
//! to a single human-readable message through `Display`, which is exactly what stores
//! record in their `error` field and what action hooks show to the user.

use thiserror::Error;

/// Message used when a response cannot be interpreted as an envelope.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid server response";

/// The main error type for inventory client operations.
///
/// Variants are grouped by where the failure originated: the network, the HTTP
/// status line, the response envelope, local persistence, or configuration. The
/// `Display` output never carries a variant prefix for the request-level variants,
/// because those strings are shown verbatim on screen.
///
/// # Examples
///
/// ```
/// use pump_inventory::InventoryError;
///
/// let err = InventoryError::Envelope("Serial number already registered".to_string());
/// assert_eq!(err.to_string(), "Serial number already registered");
/// ```
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The request never produced an HTTP response.
    ///
    /// Connection refused, DNS failure, timeouts and similar transport faults.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    ///
    /// `message` is already resolved from the body (or the status line when the
    /// body could not be parsed).
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Human-readable failure message.
        message: String,
    },

    /// The server answered 2xx but the envelope reported `success: false`.
    #[error("{0}")]
    Envelope(String),

    /// The response body was not a valid envelope or lacked a required field.
    #[error("{0}")]
    InvalidResponse(String),

    /// A request body could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// No credentials are available for an operation that requires them.
    #[error("{0}")]
    Auth(String),

    /// Local snapshot storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InventoryError {
    /// Builds the error returned for an unusable response body.
    #[must_use]
    pub fn invalid_response() -> Self {
        Self::InvalidResponse(INVALID_RESPONSE_MESSAGE.to_string())
    }

    /// Returns the HTTP status for errors that carry one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for failures reported by the server itself (status or envelope).
    #[must_use]
    pub const fn is_server_rejection(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Envelope(_))
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A specialized `Result` type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
