//! Session state: who is logged in right now.
//!
//! The session holds the decoded [`User`], never the token - the token's
//! sole durable owner is storage, and the dispatcher reads it there at the
//! moment of each request.

use tokio::sync::RwLock;
use tracing::instrument;

use crate::api;
use crate::error::StorageError;
use crate::http::ApiClient;
use crate::navigator::routes;
use crate::storage::keys;
use crate::types::User;

/// Snapshot of the authentication state.
#[derive(Debug, Clone)]
pub struct Session {
    /// The logged-in user, if any.
    pub user: Option<User>,
    /// Whether a user is logged in.
    pub is_authenticated: bool,
    /// True until the initial authentication probe settles, so the
    /// presentation layer can avoid flashing a premature "logged out"
    /// state.
    pub is_loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }
}

/// Owner of the [`Session`]; mutated only by `login`, `logout`, and
/// `check_auth`.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<Session>,
}

impl SessionStore {
    /// Create a store in the initial (loading) state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session snapshot.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Probe the persisted token against `/auth/me` and settle the session.
    ///
    /// No token means logged out. A present token that the backend rejects
    /// for any reason also means logged out - expiry is not an error here.
    /// Either way `is_loading` flips false.
    #[instrument(skip_all)]
    pub async fn check_auth(&self, client: &ApiClient) -> Session {
        let has_token = matches!(client.storage().get(keys::ACCESS_TOKEN), Ok(Some(_)));

        let user = if has_token {
            api::auth::me(client).await.ok()
        } else {
            None
        };

        let session = Session {
            is_authenticated: user.is_some(),
            user,
            is_loading: false,
        };
        *self.state.write().await = session.clone();
        session
    }

    /// Record a successful login: persist the tokens and set the identity
    /// synchronously (the caller already holds both from the login or
    /// register call).
    ///
    /// # Errors
    ///
    /// Returns an error if the tokens cannot be persisted; the session is
    /// left unchanged in that case.
    pub async fn login(
        &self,
        client: &ApiClient,
        payload: api::auth::AuthPayload,
    ) -> Result<(), StorageError> {
        client
            .storage()
            .set(keys::ACCESS_TOKEN, &payload.access_token)?;
        if let Some(refresh_token) = &payload.refresh_token {
            client.storage().set(keys::REFRESH_TOKEN, refresh_token)?;
        }

        *self.state.write().await = Session {
            user: Some(payload.user),
            is_authenticated: true,
            is_loading: false,
        };
        Ok(())
    }

    /// Log out: tell the backend (best-effort, it clears the refresh
    /// cookie), delete both persisted tokens, reset the session, and force
    /// a navigation to the home route so the presentation layer discards
    /// everything tied to the old identity.
    #[instrument(skip_all)]
    pub async fn logout(&self, client: &ApiClient) {
        // The server-side logout can fail (expired session, network); local
        // cleanup happens regardless.
        let _ = api::auth::logout(client).await;

        let _ = client.storage().remove(keys::ACCESS_TOKEN);
        let _ = client.storage().remove(keys::REFRESH_TOKEN);

        *self.state.write().await = Session {
            user: None,
            is_authenticated: false,
            is_loading: false,
        };

        client.navigator().navigate(routes::HOME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_loading_and_logged_out() {
        let store = SessionStore::new();
        let session = store.snapshot().await;
        assert!(session.is_loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }
}
