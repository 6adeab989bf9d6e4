//! Request dispatcher.
//!
//! Every backend call in the SDK funnels through [`ApiClient`]. The
//! dispatcher attaches the bearer token read from storage at the moment of
//! each request, carries the refresh cookie in its jar, and owns the
//! 401 recovery protocol:
//!
//! - a request that 401s triggers a single token refresh;
//! - 401s observed while that refresh is pending park on the
//!   [`refresh::RefreshGate`] and share its outcome;
//! - each affected request retries exactly once, and a retried request
//!   that still 401s fails with [`ApiError::SessionExpired`] without
//!   triggering another refresh.
//!
//! Non-401 failures are never retried here.

mod envelope;
mod refresh;

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::navigator::{Navigator, NoopNavigator, routes};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, keys};

use refresh::{GateTicket, RefreshGate, RefreshOutcome};

pub use reqwest::Method;

/// Request body accepted by the dispatcher.
///
/// Multipart payloads own their bytes so a request can be rebuilt for the
/// single post-refresh retry.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No body. The JSON content type is still attached.
    Empty,
    /// JSON body.
    Json(serde_json::Value),
    /// Multipart form body (file uploads). No JSON content type.
    Multipart(Vec<MultipartField>),
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub enum MultipartField {
    /// Plain text field.
    Text {
        name: String,
        value: String,
    },
    /// File field with owned contents.
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// Body shape of a backend error response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Body shape of the refresh endpoint response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

/// Authenticated REST dispatcher.
///
/// Cheaply cloneable; clones share the HTTP connection pool, the cookie
/// jar, the token storage, and the refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: url::Url,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    refresh: RefreshGate,
}

impl ApiClient {
    /// Create a client with explicit storage and navigator collaborators.
    ///
    /// No request timeout is set at this layer; callers that need one wrap
    /// the calls themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed (TLS backend initialization).
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.api_base_url.clone(),
                storage,
                navigator,
                refresh: RefreshGate::new(),
            }),
        })
    }

    /// Create a client whose storage backend follows the configuration:
    /// file-backed when `storage_path` is set, in-memory otherwise.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let storage: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(FileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        Self::new(config, storage, Arc::new(NoopNavigator))
    }

    /// The token and local-record persistence shared by this client.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.storage
    }

    pub(crate) fn navigator(&self) -> &dyn Navigator {
        self.inner.navigator.as_ref()
    }

    /// Issue a request and return the raw JSON payload.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Backend`] for non-401 non-2xx responses, carrying the
    ///   backend message when present
    /// - [`ApiError::SessionExpired`] when a 401 survives one
    ///   refresh-and-retry cycle
    /// - [`ApiError::Transport`] for network failures
    #[instrument(skip(self, payload), fields(method = %method))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<serde_json::Value, ApiError> {
        let mut is_retry = false;

        loop {
            let response = self.send_once(&method, path, &payload).await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if is_retry {
                    // The refreshed token is itself invalid or the refresh
                    // path is broken. Fail without looping.
                    warn!(path, "retried request still unauthorized");
                    return Err(ApiError::SessionExpired);
                }
                self.refresh_access_token().await?;
                is_retry = true;
                continue;
            }

            let body = response.text().await?;

            if !status.is_success() {
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .map_or_else(
                        |_| {
                            status
                                .canonical_reason()
                                .unwrap_or("request failed")
                                .to_owned()
                        },
                        |e| e.message,
                    );
                debug!(path, status = status.as_u16(), "backend error");
                return Err(ApiError::Backend {
                    status: status.as_u16(),
                    message,
                });
            }

            if body.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            return Ok(serde_json::from_str(&body)?);
        }
    }

    /// GET, decoded through the response envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`]; additionally [`ApiError::Malformed`] if
    /// the payload does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path, Payload::Empty).await?;
        envelope::decode(value)
    }

    /// POST a JSON body, decoded through the response envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let value = self
            .request(Method::POST, path, Payload::Json(serde_json::to_value(body)?))
            .await?;
        envelope::decode(value)
    }

    /// PUT a JSON body, decoded through the response envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let value = self
            .request(Method::PUT, path, Payload::Json(serde_json::to_value(body)?))
            .await?;
        envelope::decode(value)
    }

    /// DELETE, decoded through the response envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::DELETE, path, Payload::Empty).await?;
        envelope::decode(value)
    }

    /// POST a multipart form (file upload), decoded through the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<MultipartField>,
    ) -> Result<T, ApiError> {
        let value = self
            .request(Method::POST, path, Payload::Multipart(fields))
            .await?;
        envelope::decode(value)
    }

    /// PUT a multipart form (file upload), decoded through the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<MultipartField>,
    ) -> Result<T, ApiError> {
        let value = self
            .request(Method::PUT, path, Payload::Multipart(fields))
            .await?;
        envelope::decode(value)
    }

    /// Build and send one attempt. The bearer token is read from storage
    /// here, at send time, never earlier.
    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        payload: &Payload,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path);
        let mut request = self.inner.http.request(method.clone(), url);

        request = match payload {
            Payload::Empty => request.header(CONTENT_TYPE, "application/json"),
            Payload::Json(body) => request.json(body),
            Payload::Multipart(fields) => request.multipart(build_form(fields)?),
        };

        if let Some(token) = self.inner.storage.get(keys::ACCESS_TOKEN)? {
            request = request.bearer_auth(token);
        }

        Ok(request.send().await?)
    }

    /// Coalesce this 401 onto the current refresh cycle, initiating one if
    /// none is in flight.
    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        match self.inner.refresh.join() {
            GateTicket::Waiter(outcome) => match outcome.await {
                Ok(RefreshOutcome::Refreshed) => Ok(()),
                // A dropped sender means the initiator died; treat it like
                // a failed refresh.
                Ok(RefreshOutcome::Failed) | Err(_) => Err(ApiError::SessionExpired),
            },
            GateTicket::Initiator => match self.perform_refresh().await {
                Ok(token) => {
                    self.inner.storage.set(keys::ACCESS_TOKEN, &token)?;
                    self.inner.refresh.settle(RefreshOutcome::Refreshed);
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "token refresh failed");
                    self.inner.refresh.settle(RefreshOutcome::Failed);
                    let _ = self.inner.storage.remove(keys::ACCESS_TOKEN);
                    if self.inner.navigator.current_route() != routes::LOGIN {
                        self.inner.navigator.navigate(routes::LOGIN);
                    }
                    Err(ApiError::SessionExpired)
                }
            },
        }
    }

    /// The dedicated refresh request: no bearer header, authenticated by
    /// the server-set refresh cookie in the jar.
    #[instrument(skip(self))]
    async fn perform_refresh(&self) -> Result<String, ApiError> {
        let response = self
            .inner
            .http
            .post(self.endpoint("/auth/refresh"))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or_else(|_| format!("refresh failed with status {status}"), |e| e.message);
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let refreshed: RefreshResponse = envelope::decode(response.json().await?)?;
        debug!("access token refreshed");
        Ok(refreshed.access_token)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn build_form(fields: &[MultipartField]) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = ClientConfig::new("http://localhost:4000/api", "https://gw.example/_payment")
            .unwrap();
        ApiClient::from_config(&config).unwrap()
    }

    #[test]
    fn construction_is_fallible_not_panicking() {
        let config = ClientConfig::new("http://localhost:4000", "https://gw.example/_payment")
            .unwrap();
        assert!(ApiClient::from_config(&config).is_ok());
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = client();
        assert_eq!(
            client.endpoint("/auth/me"),
            "http://localhost:4000/api/auth/me"
        );
        assert_eq!(
            client.endpoint("products"),
            "http://localhost:4000/api/products"
        );
    }

    #[test]
    fn multipart_form_accepts_text_and_file_fields() {
        let fields = vec![
            MultipartField::Text {
                name: "name".to_owned(),
                value: "Tee".to_owned(),
            },
            MultipartField::File {
                name: "image".to_owned(),
                file_name: "tee.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            },
        ];
        assert!(build_form(&fields).is_ok());
    }
}
