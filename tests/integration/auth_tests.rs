//! Admin nonce integration tests.
//!
//! Tests verify:
//! - Valid nonces are accepted on every admin endpoint
//! - Missing, malformed, expired and forged nonces are rejected
//! - Rejected requests never reach the store
//! - Public endpoints need no nonce

use std::sync::atomic::Ordering;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;

use banner_carousel::store::{BannerRegistry, MemoryBannerStore};
use banner_carousel::{create_router, NonceAuth, RouterConfig, Settings};

use super::test_utils::{
    body_json, body_text, create_banner, get, post_json, save_body, send, three_slides,
    CountingStore,
};

const TEST_SECRET: &str = "test-secret-key-for-admin-nonces";

fn protected_router() -> Router {
    create_router(
        BannerRegistry::new(MemoryBannerStore::new()),
        Settings::default(),
        RouterConfig::new(TEST_SECRET),
    )
}

fn valid_nonce() -> String {
    NonceAuth::new(TEST_SECRET).issue(Duration::from_secs(3600))
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// =============================================================================
// Valid Nonces
// =============================================================================

#[tokio::test]
async fn test_valid_nonce_succeeds() {
    let router = protected_router();
    let nonce = valid_nonce();

    let id = create_banner(&router, &nonce, "Home", "home").await;

    let response = send(&router, post_json("/admin/banners/fetch", json!({"nonce": nonce, "id": id}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, post_json("/admin/banners/list", json!({"nonce": nonce}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, post_json("/admin/banners/delete", json!({"nonce": nonce, "id": id}))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Rejected Nonces
// =============================================================================

#[tokio::test]
async fn test_missing_nonce_rejected() {
    let router = protected_router();

    let response = send(&router, post_json("/admin/banners/list", json!({}))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Missing security token");
}

#[tokio::test]
async fn test_malformed_nonce_rejected() {
    let router = protected_router();

    let response = send(&router, post_json("/admin/banners/list", json!({"nonce": "not-a-token"}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Malformed security token");
}

#[tokio::test]
async fn test_expired_nonce_rejected() {
    let router = protected_router();
    let nonce = NonceAuth::new(TEST_SECRET).issue_with_expiry(now() - 60);

    let response = send(&router, post_json("/admin/banners/list", json!({"nonce": nonce}))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("expired"));
}

#[tokio::test]
async fn test_nonce_from_other_secret_rejected() {
    let router = protected_router();
    let nonce = NonceAuth::new("some-other-secret").issue(Duration::from_secs(3600));

    let response = send(&router, post_json("/admin/banners/list", json!({"nonce": nonce}))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid security token");
}

#[tokio::test]
async fn test_nonce_for_other_action_rejected() {
    let router = protected_router();
    let nonce = NonceAuth::new(TEST_SECRET)
        .with_action("another_form")
        .issue(Duration::from_secs(3600));

    let response = send(&router, post_json("/admin/banners/list", json!({"nonce": nonce}))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_save_never_reaches_store() {
    let store = CountingStore::new();
    let calls = store.counter();
    let router = create_router(
        BannerRegistry::new(store),
        Settings::default(),
        RouterConfig::new(TEST_SECRET),
    );

    let forged = format!("{}.{}", now() + 3600, "00".repeat(32));
    let body = save_body(&forged, "Home", "home", json!({}), three_slides());
    let response = send(&router, post_json("/admin/banners/save", body)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Public Endpoints
// =============================================================================

#[tokio::test]
async fn test_public_endpoints_need_no_nonce() {
    let router = protected_router();
    create_banner(&router, &valid_nonce(), "Home", "home").await;

    let response = send(&router, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, get("/banners/home")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("abc-banner-carousel"));

    let response = send(&router, get("/banners/home/payload")).await;
    assert_eq!(response.status(), StatusCode::OK);
}
