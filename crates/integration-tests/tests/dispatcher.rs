//! Black-box tests of the request dispatcher against the mock backend:
//! bearer attachment, envelope normalization, and the 401 recovery
//! protocol (coalesced refresh, retry-once, session teardown).

use clementine_client::ApiError;
use clementine_client::api::auth;
use clementine_client::navigator::routes;
use clementine_client::storage::keys;
use clementine_client::types::Product;

use clementine_integration_tests::harness::Harness;

use std::sync::atomic::Ordering;

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn valid_token_requests_never_refresh() {
    let h = Harness::spawn().await;
    h.login().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = h.client.clone();
        handles.push(tokio::spawn(async move { auth::me(&client).await }));
    }
    for handle in handles {
        let user = handle.await.expect("task").expect("request should succeed");
        assert_eq!(user.email, "asha@example.com");
    }

    assert_eq!(h.backend.state.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrapped_envelope_is_normalized() {
    let h = Harness::spawn().await;
    h.login().await;

    // The mock wraps `/auth/me` in `{ success, data }`; the façade sees
    // the bare user.
    let user = auth::me(&h.client).await.expect("me should decode");
    assert_eq!(user.name, "Asha Rao");
}

// ============================================================================
// Refresh protocol
// ============================================================================

#[tokio::test]
async fn concurrent_expired_requests_share_one_refresh() {
    let h = Harness::spawn().await;
    h.login().await;
    h.backend.state.expire_client_token();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let client = h.client.clone();
        handles.push(tokio::spawn(async move { auth::me(&client).await }));
    }
    for handle in handles {
        let user = handle
            .await
            .expect("task")
            .expect("request should recover after refresh");
        assert_eq!(user.email, "asha@example.com");
    }

    assert_eq!(h.backend.state.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refreshed_token_is_persisted() {
    let h = Harness::spawn().await;
    h.login().await;
    let fresh = h.backend.state.expire_client_token();

    auth::me(&h.client).await.expect("request should recover");

    let stored = h
        .client
        .storage()
        .get(keys::ACCESS_TOKEN)
        .expect("storage read");
    assert_eq!(stored.as_deref(), Some(fresh.as_str()));
}

#[tokio::test]
async fn stale_refresh_fails_after_one_retry() {
    let h = Harness::spawn().await;
    h.login().await;
    h.backend.state.expire_client_token();
    h.backend.state.stale_refresh.store(true, Ordering::SeqCst);

    let err = auth::me(&h.client).await.expect_err("retry should not loop");
    assert!(matches!(err, ApiError::SessionExpired));

    // One refresh, not one per 401.
    assert_eq!(h.backend.state.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_refresh_tears_the_session_down() {
    let h = Harness::spawn().await;
    h.login().await;
    h.backend.state.expire_client_token();
    h.backend.state.fail_refresh.store(true, Ordering::SeqCst);

    let err = auth::me(&h.client).await.expect_err("refresh should fail");
    assert!(matches!(err, ApiError::SessionExpired));

    let stored = h
        .client
        .storage()
        .get(keys::ACCESS_TOKEN)
        .expect("storage read");
    assert_eq!(stored, None);
    assert!(h.navigator.visited().contains(&routes::LOGIN.to_owned()));
}

#[tokio::test]
async fn failed_refresh_fails_every_parked_request() {
    let h = Harness::spawn().await;
    h.login().await;
    h.backend.state.expire_client_token();
    h.backend.state.fail_refresh.store(true, Ordering::SeqCst);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let client = h.client.clone();
        handles.push(tokio::spawn(async move { auth::me(&client).await }));
    }
    for handle in handles {
        let err = handle.await.expect("task").expect_err("all must fail");
        assert!(matches!(err, ApiError::SessionExpired));
    }

    assert!(h.navigator.visited().contains(&routes::LOGIN.to_owned()));
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn backend_message_reaches_the_caller() {
    let h = Harness::spawn().await;

    let err = h
        .client
        .get_json::<Product>("/products/missing")
        .await
        .expect_err("missing product should 404");

    match err {
        ApiError::Backend { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Product not found");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}
