//! Login state.
//!
//! [`AuthStore`] owns the login flow and writes the resulting token into the
//! shared [`Credentials`](crate::client::Credentials), where every other client
//! picks it up on its next request.

use crate::client::ApiClient;
use crate::domain::error::{InventoryError, Result};
use crate::domain::{LoginRequest, Session, User};
use std::sync::{PoisonError, RwLock};
use tracing::Instrument;

const LOGIN_PATH: &str = "auth/login";

/// Observable login state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct AuthStore {
    api: ApiClient,
    state: RwLock<AuthState>,
}

impl AuthStore {
    /// Creates a logged-out store sharing `api`'s credentials.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// Current login state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether a login is still being resolved. List screens wait on this
    /// before showing anything else.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state().loading
    }

    /// `true` when the shared credentials hold a token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.api.credentials().is_authenticated()
    }

    /// The logged-in user, if the login response carried one.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.api.credentials().user()
    }

    fn set(&self, loading: bool, error: Option<String>) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = AuthState { loading, error };
    }

    /// `POST /auth/login` and store the returned session.
    ///
    /// # Errors
    ///
    /// Returns the request failure, or [`InventoryError::InvalidResponse`] if the
    /// server accepted the login without returning a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let span = tracing::debug_span!("auth_login", email);
        async {
            self.set(true, None);
            let body = LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            };

            let result = self
                .api
                .post::<_, Session>(LOGIN_PATH, &body)
                .await
                .and_then(|session| session.ok_or_else(InventoryError::invalid_response));

            match result {
                Ok(session) => {
                    let user = session.user.clone();
                    self.api.credentials().set_session(session);
                    self.set(false, None);
                    tracing::info!(user_id = user.id, "logged in");
                    Ok(user)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "login failed");
                    self.set(false, Some(e.to_string()));
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Forgets the current session.
    pub fn logout(&self) {
        self.api.credentials().clear();
        self.set(false, None);
        tracing::info!("logged out");
    }
}
