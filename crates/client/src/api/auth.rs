//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::User;

/// Response of login and register: the identity plus the bearer token.
/// The refresh credential proper arrives as a server-set cookie the client
/// never reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: User,
    pub access_token: String,
    /// Legacy field some backend versions still send; persisted but unused
    /// by the refresh flow.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `POST /auth/login`
///
/// # Errors
///
/// `ApiError::Backend` with the backend message on bad credentials.
pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &SecretString,
) -> Result<AuthPayload, ApiError> {
    client
        .post_json(
            "/auth/login",
            &Credentials {
                email,
                password: password.expose_secret(),
            },
        )
        .await
}

/// `POST /auth/register`
///
/// # Errors
///
/// `ApiError::Backend` if the email is already registered.
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<AuthPayload, ApiError> {
    client
        .post_json(
            "/auth/register",
            &Registration {
                name,
                email,
                password: password.expose_secret(),
            },
        )
        .await
}

/// `POST /auth/logout` - clears the refresh cookie server-side.
///
/// # Errors
///
/// Propagates dispatcher errors; callers usually treat this as
/// best-effort.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    let _: serde_json::Value = client.post_json("/auth/logout", &serde_json::json!({})).await?;
    Ok(())
}

/// `GET /auth/me` - identity behind the current token.
///
/// # Errors
///
/// `ApiError::SessionExpired` if the token is gone beyond refresh.
pub async fn me(client: &ApiClient) -> Result<User, ApiError> {
    client.get_json("/auth/me").await
}
