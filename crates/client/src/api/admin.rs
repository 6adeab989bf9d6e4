//! Admin console endpoints: dashboard, order management, product CRUD.
//!
//! All of these require an account with the admin role; the backend
//! enforces that, the façade just shapes the calls.

use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{OrderId, OrderStatus, ProductId};

use crate::error::ApiError;
use crate::http::{ApiClient, MultipartField};
use crate::types::{DashboardStats, Order, Product, User};

/// Product fields for create and update.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub stock: u32,
}

/// An image to upload alongside a product.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChange {
    status: OrderStatus,
}

/// `GET /admin/stats`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn dashboard_stats(client: &ApiClient) -> Result<DashboardStats, ApiError> {
    client.get_json("/admin/stats").await
}

/// `GET /admin/orders`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn orders(client: &ApiClient) -> Result<Vec<Order>, ApiError> {
    client.get_json("/admin/orders").await
}

/// `GET /admin/customers`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn customers(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    client.get_json("/admin/customers").await
}

/// `PUT /admin/orders/{id}/status`
///
/// # Errors
///
/// Propagates dispatcher errors; the backend rejects transitions the
/// status machine does not allow.
pub async fn set_order_status(
    client: &ApiClient,
    id: &OrderId,
    status: OrderStatus,
) -> Result<Order, ApiError> {
    client
        .put_json(&format!("/admin/orders/{id}/status"), &StatusChange { status })
        .await
}

/// `POST /admin/products` - multipart: product fields plus image files.
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn create_product(
    client: &ApiClient,
    input: &ProductInput,
    images: Vec<ImageUpload>,
) -> Result<Product, ApiError> {
    client
        .post_multipart("/admin/products", product_fields(input, images))
        .await
}

/// `PUT /admin/products/{id}` - multipart; images are optional on update.
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn update_product(
    client: &ApiClient,
    id: &ProductId,
    input: &ProductInput,
    images: Vec<ImageUpload>,
) -> Result<Product, ApiError> {
    client
        .put_multipart(&format!("/admin/products/{id}"), product_fields(input, images))
        .await
}

/// `DELETE /admin/products/{id}`
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn delete_product(client: &ApiClient, id: &ProductId) -> Result<(), ApiError> {
    let _: serde_json::Value = client
        .delete_json(&format!("/admin/products/{id}"))
        .await?;
    Ok(())
}

fn product_fields(input: &ProductInput, images: Vec<ImageUpload>) -> Vec<MultipartField> {
    let mut fields = vec![
        text("name", input.name.clone()),
        text("description", input.description.clone()),
        text("price", input.price.to_string()),
        text("stock", input.stock.to_string()),
        text("sizes", input.sizes.join(",")),
        text("colors", input.colors.join(",")),
    ];

    if let Some(category) = &input.category {
        fields.push(text("category", category.clone()));
    }

    for image in images {
        fields.push(MultipartField::File {
            name: "images".to_owned(),
            file_name: image.file_name,
            content_type: image.content_type,
            bytes: image.bytes,
        });
    }

    fields
}

fn text(name: &str, value: String) -> MultipartField {
    MultipartField::Text {
        name: name.to_owned(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn product_fields_include_every_image() {
        let input = ProductInput {
            name: "Tee".to_owned(),
            description: "A tee".to_owned(),
            price: dec!(499),
            category: Some("tops".to_owned()),
            sizes: vec!["S".to_owned(), "M".to_owned()],
            colors: vec!["black".to_owned()],
            stock: 12,
        };
        let images = vec![
            ImageUpload {
                file_name: "front.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: vec![1],
            },
            ImageUpload {
                file_name: "back.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: vec![2],
            },
        ];

        let fields = product_fields(&input, images);
        let files = fields
            .iter()
            .filter(|f| matches!(f, MultipartField::File { .. }))
            .count();
        assert_eq!(files, 2);

        assert!(fields.iter().any(|f| matches!(
            f,
            MultipartField::Text { name, value } if name == "sizes" && value == "S,M"
        )));
    }
}
