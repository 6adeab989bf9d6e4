//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLEMENTINE_API_URL` - Base URL of the backend REST API
//!
//! ## Optional
//! - `CLEMENTINE_GATEWAY_URL` - Hosted payment page for the ONLINE flow
//!   (default: `https://secure.payu.in/_payment`)
//! - `CLEMENTINE_STORAGE_PATH` - Path of the JSON file backing token
//!   persistence; in-memory storage is used when unset

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default hosted payment page.
const DEFAULT_GATEWAY_URL: &str = "https://secure.payu.in/_payment";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend REST API.
    pub api_base_url: Url,
    /// Hosted payment page targeted by the gateway redirect form.
    pub gateway_url: Url,
    /// Backing file for token persistence; `None` means in-memory only.
    pub storage_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if a required variable is unset
    /// and `ConfigError::InvalidEnvVar` if a URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = require_url("CLEMENTINE_API_URL")?;

        let gateway_url = match std::env::var("CLEMENTINE_GATEWAY_URL") {
            Ok(raw) => parse_url("CLEMENTINE_GATEWAY_URL", &raw)?,
            Err(_) => parse_url("CLEMENTINE_GATEWAY_URL", DEFAULT_GATEWAY_URL)?,
        };

        let storage_path = std::env::var("CLEMENTINE_STORAGE_PATH")
            .ok()
            .map(PathBuf::from);

        Ok(Self {
            api_base_url,
            gateway_url,
            storage_path,
        })
    }

    /// Build a configuration directly, for tests and embedders.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if either URL does not parse.
    pub fn new(api_base_url: &str, gateway_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_url("api_base_url", api_base_url)?,
            gateway_url: parse_url("gateway_url", gateway_url)?,
            storage_path: None,
        })
    }
}

fn require_url(name: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))?;
    parse_url(name, &raw)
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_urls() {
        let err = ClientConfig::new("not a url", DEFAULT_GATEWAY_URL).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "api_base_url"));
    }

    #[test]
    fn default_gateway_is_well_formed() {
        let config = ClientConfig::new("http://localhost:4000", DEFAULT_GATEWAY_URL).unwrap();
        assert_eq!(config.gateway_url.scheme(), "https");
    }
}
