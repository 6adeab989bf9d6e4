//! Command implementations.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod user;

use std::sync::Arc;

use clementine_client::api::store::StoreApi;
use clementine_client::config::ClientConfig;
use clementine_client::http::ApiClient;
use clementine_client::navigator::NoopNavigator;
use clementine_client::session::SessionStore;
use clementine_client::storage::{FileStore, KeyValueStore, MemoryStore};

/// Shared command context: one client, one session, one store façade.
pub struct Context {
    pub config: ClientConfig,
    pub client: ApiClient,
    pub store: StoreApi,
    pub session: SessionStore,
}

impl Context {
    /// Build the context from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or
    /// invalid.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;

        let storage: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(FileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        let client = ApiClient::new(&config, storage, Arc::new(NoopNavigator))?;

        Ok(Self {
            store: StoreApi::new(client.clone()),
            client,
            config,
            session: SessionStore::new(),
        })
    }

    /// Resolve the session against the persisted token, failing the
    /// command if nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session probe finds no authenticated user.
    pub async fn require_login(&self) -> Result<(), Box<dyn std::error::Error>> {
        let session = self.session.check_auth(&self.client).await;
        if session.is_authenticated {
            Ok(())
        } else {
            Err("not logged in - run `clementine login` first".into())
        }
    }
}
