//! Shared, optionally persisted credential store.
//!
//! [`Credentials`] is a cheap-to-clone handle over one token slot. Every request
//! reads the token at call time, so a login or logout is visible to all clients
//! immediately without any of them caching it.

use crate::domain::error::{InventoryError, Result};
use crate::domain::{Session, User};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// What is kept on disk between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCredentials {
    token: String,
    #[serde(default)]
    user: Option<User>,
    saved_at: i64,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<StoredCredentials>,
}

/// Cloneable handle to the current bearer token.
///
/// # Examples
///
/// ```
/// use pump_inventory::client::Credentials;
///
/// let credentials = Credentials::in_memory();
/// assert!(credentials.token().is_none());
/// credentials.set_token("abc");
/// assert_eq!(credentials.token().as_deref(), Some("abc"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    slot: Arc<RwLock<Slot>>,
    file_path: Option<PathBuf>,
}

impl Credentials {
    /// Creates a handle that forgets its token when the process exits.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates a handle backed by a JSON file, loading any token already stored.
    ///
    /// A corrupt file is logged and treated as "logged out".
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the existing
    /// file cannot be read.
    pub fn persisted(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let current = if file_path.exists() {
            let contents = std::fs::read_to_string(&file_path)?;
            match serde_json::from_str::<StoredCredentials>(&contents) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    tracing::warn!(path = ?file_path, error = %e, "ignoring unreadable credentials file");
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(path = ?file_path, authenticated = current.is_some(), "credentials loaded");

        Ok(Self {
            slot: Arc::new(RwLock::new(Slot { current })),
            file_path: Some(file_path),
        })
    }

    /// Returns the current bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.current.as_ref().map(|c| c.token.clone())
    }

    /// Returns the logged-in user, if the login response carried one.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.current.as_ref().and_then(|c| c.user.clone())
    }

    /// Returns `true` when a token is available.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Stores a bare token. Persistence failures are logged, not returned.
    pub fn set_token(&self, token: impl Into<String>) {
        self.replace(Some(StoredCredentials {
            token: token.into(),
            user: None,
            saved_at: chrono::Utc::now().timestamp(),
        }));
    }

    /// Stores the token and user from a login response.
    pub fn set_session(&self, session: Session) {
        self.replace(Some(StoredCredentials {
            token: session.token,
            user: Some(session.user),
            saved_at: chrono::Utc::now().timestamp(),
        }));
    }

    /// Forgets the token, removing the file when persisted.
    pub fn clear(&self) {
        self.replace(None);
    }

    fn replace(&self, next: Option<StoredCredentials>) {
        {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            slot.current.clone_from(&next);
        }

        if let Some(path) = &self.file_path {
            if let Err(e) = Self::write_file(path, next.as_ref()) {
                tracing::warn!(path = ?path, error = %e, "failed to persist credentials");
            }
        }
    }

    fn write_file(path: &Path, stored: Option<&StoredCredentials>) -> Result<()> {
        let Some(stored) = stored else {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
            return Ok(());
        };

        let json = serde_json::to_string_pretty(stored)
            .map_err(|e| InventoryError::Storage(format!("failed to serialize credentials: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
