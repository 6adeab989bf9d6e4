//! User profile, address, wishlist, and order-history endpoints.

use serde::Serialize;

use clementine_core::{AddressId, OrderId, ProductId};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{Order, Product, SavedAddress, User};

/// Profile fields a user can change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A new or edited address (no id until saved).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// `PUT /users/profile`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> Result<User, ApiError> {
    client.put_json("/users/profile", update).await
}

/// `GET /users/addresses`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn addresses(client: &ApiClient) -> Result<Vec<SavedAddress>, ApiError> {
    client.get_json("/users/addresses").await
}

/// `POST /users/addresses`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn add_address(client: &ApiClient, input: &AddressInput) -> Result<SavedAddress, ApiError> {
    client.post_json("/users/addresses", input).await
}

/// `PUT /users/addresses/{id}`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn update_address(
    client: &ApiClient,
    id: &AddressId,
    input: &AddressInput,
) -> Result<SavedAddress, ApiError> {
    client
        .put_json(&format!("/users/addresses/{id}"), input)
        .await
}

/// `DELETE /users/addresses/{id}`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn delete_address(client: &ApiClient, id: &AddressId) -> Result<(), ApiError> {
    let _: serde_json::Value = client
        .delete_json(&format!("/users/addresses/{id}"))
        .await?;
    Ok(())
}

/// `GET /users/wishlist`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn wishlist(client: &ApiClient) -> Result<Vec<Product>, ApiError> {
    client.get_json("/users/wishlist").await
}

/// `POST /users/wishlist/{productId}` - add if absent, remove if present.
/// Returns the updated wishlist.
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn toggle_wishlist(
    client: &ApiClient,
    product_id: &ProductId,
) -> Result<Vec<Product>, ApiError> {
    client
        .post_json(
            &format!("/users/wishlist/{product_id}"),
            &serde_json::json!({}),
        )
        .await
}

/// `GET /users/orders`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn orders(client: &ApiClient) -> Result<Vec<Order>, ApiError> {
    client.get_json("/users/orders").await
}

/// `GET /users/orders/{id}`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn order(client: &ApiClient, id: &OrderId) -> Result<Order, ApiError> {
    client.get_json(&format!("/users/orders/{id}")).await
}
