//! Integration test support: an in-process mock backend.
//!
//! The mock implements just enough of the REST contract to exercise the
//! client SDK end to end: cookie-based refresh, bearer-gated resources,
//! profile/address/wishlist state, multipart product uploads, and the
//! order-creation endpoint with both payment modes. Counters and recorded
//! request bodies make the refresh-coalescing and submit-once guarantees
//! observable.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use serde_json::{Value, json};

/// The refresh cookie the mock issues at login and demands at refresh.
const REFRESH_COOKIE: &str = "refreshToken=mock-refresh";

/// A multipart product upload as the backend received it.
#[derive(Debug, Clone, Default)]
pub struct ProductUpload {
    /// Text fields by name.
    pub texts: BTreeMap<String, String>,
    /// Uploaded files: `(field_name, file_name, bytes)`.
    pub files: Vec<(String, String, Vec<u8>)>,
}

/// Shared, observable backend state.
pub struct BackendState {
    /// The only bearer token the protected routes accept right now.
    valid_token: Mutex<String>,
    token_serial: AtomicUsize,
    /// Number of `POST /auth/refresh` calls observed.
    pub refresh_calls: AtomicUsize,
    /// Number of `POST /payment/create-order` calls observed.
    pub order_calls: AtomicUsize,
    /// When set, refresh responds 401.
    pub fail_refresh: AtomicBool,
    /// When set, refresh succeeds but returns a token the protected
    /// routes will not accept.
    pub stale_refresh: AtomicBool,
    /// When set, order creation reports `success: false`.
    pub fail_orders: AtomicBool,
    /// Items served by `GET /users/cart`.
    pub cart_items: Mutex<Value>,
    /// Body of the last order-creation request.
    pub last_order_body: Mutex<Option<Value>>,
    /// Product ids currently on the wishlist.
    pub wishlist: Mutex<Vec<String>>,
    /// Saved addresses, keyed by assigned id.
    pub addresses: Mutex<Vec<Value>>,
    address_serial: AtomicUsize,
    /// The user served by identity and profile endpoints.
    pub profile: Mutex<Value>,
    /// The last multipart product create/update received.
    pub last_product_upload: Mutex<Option<ProductUpload>>,
}

impl BackendState {
    fn new() -> Self {
        Self {
            valid_token: Mutex::new("token-1".to_owned()),
            token_serial: AtomicUsize::new(1),
            refresh_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
            fail_refresh: AtomicBool::new(false),
            stale_refresh: AtomicBool::new(false),
            fail_orders: AtomicBool::new(false),
            cart_items: Mutex::new(json!([])),
            last_order_body: Mutex::new(None),
            wishlist: Mutex::new(Vec::new()),
            addresses: Mutex::new(Vec::new()),
            address_serial: AtomicUsize::new(0),
            profile: Mutex::new(MockBackend::mock_user()),
            last_product_upload: Mutex::new(None),
        }
    }

    fn current_token(&self) -> String {
        self.valid_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rotate the valid token without telling the client, so its stored
    /// token is now expired.
    pub fn expire_client_token(&self) -> String {
        let serial = self.token_serial.fetch_add(1, Ordering::SeqCst) + 1;
        let fresh = format!("token-{serial}");
        *self
            .valid_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = fresh.clone();
        fresh
    }

    fn accepts(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.current_token());
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }

    fn has_refresh_cookie(headers: &HeaderMap) -> bool {
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(REFRESH_COOKIE))
    }
}

/// A running mock backend.
pub struct MockBackend {
    /// Base URL to point the client at.
    pub base_url: String,
    /// Observable state shared with the handlers.
    pub state: Arc<BackendState>,
}

impl MockBackend {
    /// Bind to an ephemeral port and serve the mock in a background task.
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::new());

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/logout", post(logout))
            .route("/auth/refresh", post(refresh))
            .route("/auth/me", get(me))
            .route("/users/profile", put(update_profile))
            .route("/users/orders", get(user_orders))
            .route("/users/orders/{id}", get(user_order))
            .route("/users/addresses", get(list_addresses).post(add_address))
            .route(
                "/users/addresses/{id}",
                put(update_address).delete(delete_address),
            )
            .route("/users/cart", get(cart))
            .route("/users/wishlist", get(wishlist))
            .route("/users/wishlist/{id}", post(toggle_wishlist))
            .route("/products", get(products))
            .route("/products/{id}", get(product))
            .route("/payment/create-order", post(create_order))
            .route("/admin/stats", get(admin_stats))
            .route("/admin/orders", get(admin_orders))
            .route("/admin/orders/{id}/status", put(set_order_status))
            .route("/admin/customers", get(admin_customers))
            .route("/admin/products", post(create_product))
            .route(
                "/admin/products/{id}",
                put(update_product).delete(delete_product),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr: SocketAddr = listener.local_addr().expect("mock backend addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// The user every identity endpoint returns.
    #[must_use]
    pub fn mock_user() -> Value {
        json!({ "id": "u-1", "name": "Asha Rao", "email": "asha@example.com" })
    }

    /// A fixed order served by the order-history endpoints.
    #[must_use]
    pub fn mock_order(id: &str) -> Value {
        json!({
            "id": id,
            "status": "PENDING",
            "paymentMethod": "COD",
            "paymentStatus": "PENDING",
            "total": "589",
            "createdAt": "2026-08-01T10:00:00Z",
        })
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(json!({ "message": "jwt expired" })),
    )
        .into_response()
}

fn ok_json(body: Value) -> Response {
    (StatusCode::OK, axum::Json(body)).into_response()
}

async fn login(State(state): State<Arc<BackendState>>) -> Response {
    let body = json!({
        "user": MockBackend::mock_user(),
        "accessToken": state.current_token(),
    });
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            format!("{REFRESH_COOKIE}; HttpOnly; Path=/"),
        )],
        axum::Json(body),
    )
        .into_response()
}

async fn logout() -> Response {
    ok_json(json!({ "success": true }))
}

async fn refresh(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    // Hold the refresh open briefly so concurrent 401s pile onto one cycle.
    tokio::time::sleep(Duration::from_millis(50)).await;

    if state.fail_refresh.load(Ordering::SeqCst) || !BackendState::has_refresh_cookie(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "message": "refresh token expired" })),
        )
            .into_response();
    }

    let token = if state.stale_refresh.load(Ordering::SeqCst) {
        "stale-token".to_owned()
    } else {
        state.current_token()
    };

    ok_json(json!({ "accessToken": token }))
}

async fn me(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    let user = state
        .profile
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    // Wrapped in a data envelope on purpose: the dispatcher normalizes it.
    ok_json(json!({ "success": true, "data": user }))
}

async fn update_profile(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    let mut profile = state
        .profile
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    for field in ["name", "email"] {
        if let Some(value) = body.get(field) {
            profile[field] = value.clone();
        }
    }
    ok_json(profile.clone())
}

async fn user_orders(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    ok_json(json!([MockBackend::mock_order("ord-1")]))
}

async fn user_order(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    ok_json(MockBackend::mock_order(&id))
}

async fn list_addresses(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    let addresses = state
        .addresses
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    ok_json(Value::Array(addresses))
}

async fn add_address(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    axum::Json(mut body): axum::Json<Value>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    let serial = state.address_serial.fetch_add(1, Ordering::SeqCst) + 1;
    body["id"] = json!(format!("addr-{serial}"));
    state
        .addresses
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(body.clone());
    ok_json(body)
}

async fn update_address(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    axum::Json(mut body): axum::Json<Value>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    body["id"] = json!(id);
    let mut addresses = state
        .addresses
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    match addresses.iter_mut().find(|a| a["id"] == body["id"]) {
        Some(existing) => {
            *existing = body.clone();
            ok_json(body)
        }
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": "Address not found" })),
        )
            .into_response(),
    }
}

async fn delete_address(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    state
        .addresses
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .retain(|a| a["id"] != json!(id));
    ok_json(json!({ "success": true }))
}

async fn cart(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    let items = state
        .cart_items
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    ok_json(json!({ "items": items }))
}

fn wishlist_products(state: &BackendState) -> Value {
    let ids = state
        .wishlist
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    Value::Array(
        ids.into_iter()
            .map(|id| json!({ "id": id, "name": "Clementine Tee", "price": 499 }))
            .collect(),
    )
}

async fn wishlist(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    ok_json(wishlist_products(&state))
}

async fn toggle_wishlist(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    {
        let mut ids = state
            .wishlist
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(pos) = ids.iter().position(|existing| *existing == id) {
            ids.remove(pos);
        } else {
            ids.push(id);
        }
    }
    ok_json(wishlist_products(&state))
}

async fn products() -> Response {
    ok_json(json!({
        "products": [
            { "id": "p-1", "name": "Clementine Tee", "price": 499, "stock": 10 }
        ],
        "page": 1,
        "totalPages": 1,
    }))
}

async fn product(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": "Product not found" })),
        )
            .into_response();
    }
    ok_json(json!({ "id": id, "name": "Clementine Tee", "price": 499 }))
}

async fn create_order(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }

    state.order_calls.fetch_add(1, Ordering::SeqCst);
    *state
        .last_order_body
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(body.clone());

    if state.fail_orders.load(Ordering::SeqCst) {
        return ok_json(json!({ "success": false, "message": "inventory conflict" }));
    }

    let response = match body.get("paymentMethod").and_then(Value::as_str) {
        Some("ONLINE") => json!({
            "success": true,
            "mode": "ONLINE",
            "payuParams": {
                "key": "merchant-key",
                "txnid": "txn-123",
                "amount": "118.00",
                "hash": "deadbeef",
            },
        }),
        _ => json!({ "success": true, "mode": "COD", "orderId": "ord-1" }),
    };

    ok_json(response)
}

async fn admin_stats(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    ok_json(json!({
        "totalOrders": 12,
        "totalRevenue": "7068",
        "totalCustomers": 3,
        "pendingOrders": 2,
    }))
}

async fn admin_orders(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    ok_json(json!([MockBackend::mock_order("ord-1")]))
}

async fn set_order_status(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    let mut order = MockBackend::mock_order(&id);
    order["status"] = body["status"].clone();
    ok_json(order)
}

async fn admin_customers(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    ok_json(json!([MockBackend::mock_user()]))
}

async fn record_upload(state: &BackendState, mut multipart: Multipart) -> Result<Value, Response> {
    let mut upload = ProductUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({ "message": e.to_string() })),
        )
            .into_response()
    })? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.unwrap_or_default();

        match file_name {
            Some(file_name) => upload.files.push((name, file_name, bytes.to_vec())),
            None => {
                upload
                    .texts
                    .insert(name, String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }

    let product = json!({
        "id": "p-new",
        "name": upload.texts.get("name").cloned().unwrap_or_default(),
        "price": upload.texts.get("price").cloned().unwrap_or_default(),
        "images": upload
            .files
            .iter()
            .map(|(_, file_name, _)| format!("/uploads/{file_name}"))
            .collect::<Vec<_>>(),
    });

    *state
        .last_product_upload
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(upload);

    Ok(product)
}

async fn create_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    match record_upload(&state, multipart).await {
        Ok(product) => ok_json(product),
        Err(response) => response,
    }
}

async fn update_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    match record_upload(&state, multipart).await {
        Ok(mut product) => {
            product["id"] = json!(id);
            ok_json(product)
        }
        Err(response) => response,
    }
}

async fn delete_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if !state.accepts(&headers) {
        return unauthorized();
    }
    ok_json(json!({ "success": true }))
}

/// Client-side harness wired to a fresh mock backend.
pub mod harness {
    use std::sync::Arc;

    use secrecy::SecretString;

    use clementine_client::config::ClientConfig;
    use clementine_client::http::ApiClient;
    use clementine_client::navigator::RecordingNavigator;
    use clementine_client::session::SessionStore;
    use clementine_client::storage::MemoryStore;
    use clementine_client::api;

    use super::MockBackend;

    /// Gateway URL used by every test checkout.
    pub const GATEWAY_URL: &str = "https://gateway.test/_payment";

    /// One backend plus one fully wired client.
    pub struct Harness {
        pub backend: MockBackend,
        pub client: ApiClient,
        pub session: SessionStore,
        pub navigator: Arc<RecordingNavigator>,
    }

    impl Harness {
        /// Spawn a mock backend and a client with in-memory storage and a
        /// recording navigator.
        pub async fn spawn() -> Self {
            let backend = MockBackend::spawn().await;
            let config = ClientConfig::new(&backend.base_url, GATEWAY_URL)
                .expect("test config should parse");
            let navigator = Arc::new(RecordingNavigator::new());
            let client = ApiClient::new(
                &config,
                Arc::new(MemoryStore::new()),
                Arc::clone(&navigator) as Arc<dyn clementine_client::navigator::Navigator>,
            )
            .expect("test client should build");
            Self {
                backend,
                client,
                session: SessionStore::new(),
                navigator,
            }
        }

        /// Log in through the real endpoint so the cookie jar holds the
        /// refresh cookie and storage holds the access token.
        pub async fn login(&self) {
            let payload = api::auth::login(
                &self.client,
                "asha@example.com",
                &SecretString::from("hunter2"),
            )
            .await
            .expect("mock login should succeed");
            self.session
                .login(&self.client, payload)
                .await
                .expect("session login should persist tokens");
        }
    }
}
