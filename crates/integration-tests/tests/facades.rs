//! End-to-end coverage of the user and admin façades against the mock
//! backend: profile, addresses, wishlist, order history, dashboard, and
//! the multipart product upload path (including its post-refresh retry).

use std::sync::PoisonError;
use std::sync::atomic::Ordering;

use rust_decimal::dec;

use clementine_client::api::{admin, user};
use clementine_core::{AddressId, OrderId, OrderStatus, ProductId};

use clementine_integration_tests::harness::Harness;

fn address_input(city: &str) -> user::AddressInput {
    user::AddressInput {
        first_name: "Asha".to_owned(),
        last_name: "Rao".to_owned(),
        email: "asha@example.com".to_owned(),
        phone: "9876543210".to_owned(),
        address: "12 Lake Road".to_owned(),
        city: city.to_owned(),
        state: "MH".to_owned(),
        zip_code: "411001".to_owned(),
        country: "India".to_owned(),
    }
}

fn product_input() -> admin::ProductInput {
    admin::ProductInput {
        name: "Clementine Hoodie".to_owned(),
        description: "Warm".to_owned(),
        price: dec!(1299),
        category: Some("tops".to_owned()),
        sizes: vec!["M".to_owned(), "L".to_owned()],
        colors: vec!["orange".to_owned()],
        stock: 5,
    }
}

fn png(file_name: &str, bytes: Vec<u8>) -> admin::ImageUpload {
    admin::ImageUpload {
        file_name: file_name.to_owned(),
        content_type: "image/png".to_owned(),
        bytes,
    }
}

// ============================================================================
// User façade
// ============================================================================

#[tokio::test]
async fn profile_update_round_trips() {
    let h = Harness::spawn().await;
    h.login().await;

    let updated = user::update_profile(
        &h.client,
        &user::ProfileUpdate {
            name: Some("Asha R.".to_owned()),
            email: None,
        },
    )
    .await
    .expect("profile update should succeed");

    assert_eq!(updated.name, "Asha R.");
    assert_eq!(updated.email, "asha@example.com");
}

#[tokio::test]
async fn addresses_crud_round_trips() {
    let h = Harness::spawn().await;
    h.login().await;

    let saved = user::add_address(&h.client, &address_input("Pune"))
        .await
        .expect("add should succeed");
    assert_eq!(saved.city, "Pune");

    let updated = user::update_address(&h.client, &saved.id, &address_input("Mumbai"))
        .await
        .expect("update should succeed");
    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.city, "Mumbai");

    let listed = user::addresses(&h.client).await.expect("list should succeed");
    assert_eq!(listed.len(), 1);

    user::delete_address(&h.client, &saved.id)
        .await
        .expect("delete should succeed");
    let listed = user::addresses(&h.client).await.expect("list should succeed");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn updating_a_missing_address_is_a_backend_error() {
    let h = Harness::spawn().await;
    h.login().await;

    let err = user::update_address(&h.client, &AddressId::new("addr-404"), &address_input("Pune"))
        .await
        .expect_err("unknown id should fail");
    assert_eq!(err.to_string(), "Address not found");
}

#[tokio::test]
async fn wishlist_toggle_adds_then_removes() {
    let h = Harness::spawn().await;
    h.login().await;

    let id = ProductId::new("p-1");

    let after_add = user::toggle_wishlist(&h.client, &id)
        .await
        .expect("toggle should succeed");
    assert_eq!(after_add.len(), 1);
    assert_eq!(after_add[0].id, id);

    let after_remove = user::toggle_wishlist(&h.client, &id)
        .await
        .expect("toggle should succeed");
    assert!(after_remove.is_empty());

    let listed = user::wishlist(&h.client).await.expect("list should succeed");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn order_history_and_detail() {
    let h = Harness::spawn().await;
    h.login().await;

    let orders = user::orders(&h.client).await.expect("history should load");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total, dec!(589));

    let order = user::order(&h.client, &OrderId::new("ord-1"))
        .await
        .expect("detail should load");
    assert_eq!(order.id, OrderId::new("ord-1"));
    assert_eq!(order.status, OrderStatus::Pending);
}

// ============================================================================
// Admin façade
// ============================================================================

#[tokio::test]
async fn dashboard_customers_and_status_change() {
    let h = Harness::spawn().await;
    h.login().await;

    let stats = admin::dashboard_stats(&h.client).await.expect("stats");
    assert_eq!(stats.total_orders, 12);
    assert_eq!(stats.total_revenue, dec!(7068));

    let customers = admin::customers(&h.client).await.expect("customers");
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].email, "asha@example.com");

    let updated =
        admin::set_order_status(&h.client, &OrderId::new("ord-1"), OrderStatus::Confirmed)
            .await
            .expect("status change");
    assert_eq!(updated.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn create_product_uploads_fields_and_images() {
    let h = Harness::spawn().await;
    h.login().await;

    let images = vec![png("front.png", vec![1, 2, 3]), png("back.png", vec![4, 5])];
    let product = admin::create_product(&h.client, &product_input(), images)
        .await
        .expect("create should succeed");

    assert_eq!(product.name, "Clementine Hoodie");
    assert_eq!(product.images.len(), 2);

    let upload = h
        .backend
        .state
        .last_product_upload
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .expect("upload recorded");
    assert_eq!(upload.texts.get("price").map(String::as_str), Some("1299"));
    assert_eq!(upload.texts.get("sizes").map(String::as_str), Some("M,L"));
    assert_eq!(upload.files.len(), 2);
    assert_eq!(upload.files[0].1, "front.png");
    assert_eq!(upload.files[0].2, vec![1, 2, 3]);
}

#[tokio::test]
async fn update_and_delete_product() {
    let h = Harness::spawn().await;
    h.login().await;

    let id = ProductId::new("p-1");
    let updated = admin::update_product(&h.client, &id, &product_input(), Vec::new())
        .await
        .expect("update should succeed");
    assert_eq!(updated.id, id);
    assert!(updated.images.is_empty());

    admin::delete_product(&h.client, &id)
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn multipart_upload_survives_a_token_refresh() {
    let h = Harness::spawn().await;
    h.login().await;
    h.backend.state.expire_client_token();

    // The first attempt 401s; the retried request must carry a rebuilt
    // form with the same bytes.
    let images = vec![png("front.png", vec![9, 9, 9])];
    let product = admin::create_product(&h.client, &product_input(), images)
        .await
        .expect("create should recover after refresh");
    assert_eq!(product.images, vec!["/uploads/front.png".to_owned()]);

    assert_eq!(h.backend.state.refresh_calls.load(Ordering::SeqCst), 1);

    let upload = h
        .backend
        .state
        .last_product_upload
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .expect("upload recorded");
    assert_eq!(upload.files.len(), 1);
    assert_eq!(upload.files[0].2, vec![9, 9, 9]);
}
