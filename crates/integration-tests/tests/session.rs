//! Session lifecycle against the mock backend: the login/check-auth round
//! trip, the no-token fast path, and logout cleanup.

use clementine_client::navigator::routes;
use clementine_client::storage::keys;

use clementine_integration_tests::harness::Harness;

#[tokio::test]
async fn login_then_check_auth_round_trips() {
    let h = Harness::spawn().await;
    h.login().await;

    let session = h.session.check_auth(&h.client).await;
    assert!(session.is_authenticated);
    assert!(!session.is_loading);
    assert_eq!(
        session.user.map(|u| u.email),
        Some("asha@example.com".to_owned())
    );
}

#[tokio::test]
async fn missing_token_settles_logged_out() {
    let h = Harness::spawn().await;

    let session = h.session.check_auth(&h.client).await;
    assert!(!session.is_authenticated);
    assert!(!session.is_loading);
    assert!(session.user.is_none());
}

#[tokio::test]
async fn login_persists_the_access_token() {
    let h = Harness::spawn().await;
    h.login().await;

    let stored = h
        .client
        .storage()
        .get(keys::ACCESS_TOKEN)
        .expect("storage read");
    assert!(stored.is_some());
}

#[tokio::test]
async fn logout_clears_tokens_and_goes_home() {
    let h = Harness::spawn().await;
    h.login().await;

    h.session.logout(&h.client).await;

    let storage = h.client.storage();
    assert_eq!(storage.get(keys::ACCESS_TOKEN).expect("storage read"), None);
    assert_eq!(
        storage.get(keys::REFRESH_TOKEN).expect("storage read"),
        None
    );

    let session = h.session.snapshot().await;
    assert!(!session.is_authenticated);
    assert!(session.user.is_none());

    assert_eq!(
        h.navigator.visited().last().map(String::as_str),
        Some(routes::HOME)
    );
}
