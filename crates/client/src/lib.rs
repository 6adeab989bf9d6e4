//! Clementine client SDK.
//!
//! This crate is the client side of the Clementine REST contract: it owns
//! the authenticated request lifecycle (token storage, bearer dispatch,
//! coordinated 401 refresh with retry-once semantics), the session state,
//! the per-resource API façades, and the checkout orchestrator.
//!
//! # Architecture
//!
//! - [`http::ApiClient`] - request dispatcher; the only component that talks
//!   to the network. All 401s funnel into a single refresh at a time.
//! - [`storage`] - durable key-value persistence for the access token and
//!   the short-lived buy-now record.
//! - [`session::SessionStore`] - current identity and authentication flag.
//! - [`api`] - thin typed façades grouped by resource (auth, user, store,
//!   admin, payment).
//! - [`checkout`] - order submission: item sourcing, validation, totals,
//!   payment-mode branching, gateway redirect.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use clementine_client::config::ClientConfig;
//! use clementine_client::http::ApiClient;
//! use clementine_client::navigator::NoopNavigator;
//! use clementine_client::session::SessionStore;
//! use clementine_client::storage::MemoryStore;
//!
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config, Arc::new(MemoryStore::new()), Arc::new(NoopNavigator))?;
//!
//! let session = SessionStore::new();
//! let payload = clementine_client::api::auth::login(&client, "a@b.co", &password).await?;
//! session.login(&client, payload).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod navigator;
pub mod session;
pub mod storage;
pub mod types;

pub use config::ClientConfig;
pub use error::{ApiError, StorageError};
pub use http::ApiClient;
pub use session::SessionStore;
