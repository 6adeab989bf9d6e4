//! Catalog and cart endpoints.
//!
//! Catalog reads are cached in-memory for five minutes; cart operations
//! always hit the backend.

use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use clementine_core::ProductId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{Cart, CartLineInput, Product, ProductPage};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    Products {
        page: u32,
        category: Option<String>,
    },
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
}

/// Store façade: products and cart.
#[derive(Clone)]
pub struct StoreApi {
    client: ApiClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl StoreApi {
    /// Create a store façade over `client`.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { client, cache }
    }

    /// `GET /products?page=&category=` - one catalog page, cached.
    ///
    /// # Errors
    ///
    /// Propagates dispatcher errors on cache miss.
    pub async fn products(
        &self,
        page: u32,
        category: Option<&str>,
    ) -> Result<ProductPage, ApiError> {
        let key = CacheKey::Products {
            page,
            category: category.map(str::to_owned),
        };

        if let Some(CacheValue::Products(cached)) = self.cache.get(&key).await {
            debug!(page, "catalog page served from cache");
            return Ok(cached);
        }

        let mut path = format!("/products?page={page}");
        if let Some(category) = category {
            path.push_str("&category=");
            path.push_str(category);
        }

        let fetched: ProductPage = self.client.get_json(&path).await?;
        self.cache
            .insert(key, CacheValue::Products(fetched.clone()))
            .await;
        Ok(fetched)
    }

    /// `GET /products/{id}` - one product, cached.
    ///
    /// # Errors
    ///
    /// Propagates dispatcher errors on cache miss.
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(cached)) = self.cache.get(&key).await {
            return Ok(*cached);
        }

        let fetched: Product = self.client.get_json(&format!("/products/{id}")).await?;
        self.cache
            .insert(key, CacheValue::Product(Box::new(fetched.clone())))
            .await;
        Ok(fetched)
    }

    /// `GET /users/cart` - the persisted cart resource.
    ///
    /// # Errors
    ///
    /// Propagates dispatcher errors.
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        self.client.get_json("/users/cart").await
    }

    /// `POST /users/cart` - add a line (or bump its quantity).
    ///
    /// # Errors
    ///
    /// Propagates dispatcher errors.
    pub async fn add_to_cart(&self, line: &CartLineInput) -> Result<Cart, ApiError> {
        self.client.post_json("/users/cart", line).await
    }

    /// `PUT /users/cart/{productId}` - set a line's quantity.
    ///
    /// # Errors
    ///
    /// Propagates dispatcher errors.
    pub async fn update_cart_line(&self, line: &CartLineInput) -> Result<Cart, ApiError> {
        self.client
            .put_json(&format!("/users/cart/{}", line.product_id), line)
            .await
    }

    /// `DELETE /users/cart/{productId}` - remove a line.
    ///
    /// # Errors
    ///
    /// Propagates dispatcher errors.
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<Cart, ApiError> {
        self.client
            .delete_json(&format!("/users/cart/{product_id}"))
            .await
    }
}
