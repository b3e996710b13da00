//! Admin RPC integration tests.
//!
//! Tests verify:
//! - Create, update, fetch, list and delete through the router
//! - Validation failures return `{ok: false}` and never touch the store
//! - Store failures map to 404 and 409

use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;

use banner_carousel::store::{BannerRegistry, MemoryBannerStore};
use banner_carousel::{create_dev_router, create_router, RouterConfig, Settings};

use super::test_utils::{
    body_json, create_banner, post_json, save_body, send, three_slides, CountingStore,
};

fn dev_router() -> axum::Router {
    create_dev_router(BannerRegistry::new(MemoryBannerStore::new()))
}

// =============================================================================
// Save
// =============================================================================

#[tokio::test]
async fn test_save_creates_banner() {
    let router = dev_router();

    let body = save_body("", "Home page", "home", json!({"autoplay": false}), three_slides());
    let response = send(&router, post_json("/admin/banners/save", body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["id"], 1);
    assert_eq!(json["message"], "Banner saved successfully");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_save_with_id_updates_in_place() {
    let router = dev_router();
    let id = create_banner(&router, "", "Home", "home").await;

    let mut body = save_body(
        "",
        "Landing",
        "landing",
        json!({}),
        json!([{"image": "https://example.com/new.jpg"}]),
    );
    body["id"] = json!(id);
    let json = body_json(send(&router, post_json("/admin/banners/save", body)).await).await;
    assert_eq!(json["id"], id);

    let fetched = body_json(
        send(&router, post_json("/admin/banners/fetch", json!({"nonce": "", "id": id}))).await,
    )
    .await;
    assert_eq!(fetched["banner"]["name"], "Landing");
    assert_eq!(fetched["banner"]["slug"], "landing");
    assert_eq!(fetched["banner"]["slides"].as_array().unwrap().len(), 1);

    let listing =
        body_json(send(&router, post_json("/admin/banners/list", json!({"nonce": ""}))).await)
            .await;
    assert_eq!(listing["banners"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_with_zero_id_creates() {
    let router = dev_router();
    create_banner(&router, "", "Home", "home").await;

    let mut body = save_body("", "Other", "other", json!({}), three_slides());
    body["id"] = json!(0);
    let json = body_json(send(&router, post_json("/admin/banners/save", body)).await).await;
    assert_eq!(json["id"], 2);
}

#[tokio::test]
async fn test_save_normalizes_slug_case() {
    let router = dev_router();
    create_banner(&router, "", "Home", "  HOME ").await;

    let fetched = body_json(
        send(&router, post_json("/admin/banners/fetch", json!({"nonce": "", "id": 1}))).await,
    )
    .await;
    assert_eq!(fetched["banner"]["slug"], "home");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_empty_slides_rejected_before_store() {
    let store = CountingStore::new();
    let calls = store.counter();
    let router = create_router(
        BannerRegistry::new(store),
        Settings::default(),
        RouterConfig::without_auth(),
    );

    let body = save_body("", "Home", "home", json!({}), json!([]));
    let response = send(&router, post_json("/admin/banners/save", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Please add at least one slide");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_name_or_slug_rejected() {
    let store = CountingStore::new();
    let calls = store.counter();
    let router = create_router(
        BannerRegistry::new(store),
        Settings::default(),
        RouterConfig::without_auth(),
    );

    let body = save_body("", "  ", "home", json!({}), three_slides());
    let json = body_json(send(&router, post_json("/admin/banners/save", body)).await).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Name and slug are required");

    let body = save_body("", "Home", "", json!({}), three_slides());
    let json = body_json(send(&router, post_json("/admin/banners/save", body)).await).await;
    assert_eq!(json["error"], "Name and slug are required");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_payloads_rejected() {
    let router = dev_router();

    let body = json!({
        "nonce": "",
        "name": "Home",
        "slug": "home",
        "settings": "{}",
        "slides": "not json",
    });
    let response = send(&router, post_json("/admin/banners/save", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid slides data"));

    let body = save_body("", "Home", "home page!", json!({}), three_slides());
    let response = send(&router, post_json("/admin/banners/save", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let router = dev_router();
    create_banner(&router, "", "Home", "home").await;

    let body = save_body("", "Second", "home", json!({}), three_slides());
    let response = send(&router, post_json("/admin/banners/save", body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().unwrap().contains("home"));
}

#[tokio::test]
async fn test_update_missing_banner() {
    let router = dev_router();

    let mut body = save_body("", "Home", "home", json!({}), three_slides());
    body["id"] = json!(42);
    let response = send(&router, post_json("/admin/banners/save", body)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Banner not found");
}

// =============================================================================
// Fetch / Delete / List
// =============================================================================

#[tokio::test]
async fn test_fetch_returns_stored_banner() {
    let router = dev_router();
    let id = create_banner(&router, "", "Home", "home").await;

    let response = send(&router, post_json("/admin/banners/fetch", json!({"nonce": "", "id": id}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["banner"]["id"], id);
    assert_eq!(json["banner"]["slides"][0]["image"], "https://example.com/one.jpg");
    assert_eq!(json["banner"]["slides"][0]["title"], "Sale");
}

#[tokio::test]
async fn test_fetch_missing_banner() {
    let router = dev_router();
    let response = send(&router, post_json("/admin/banners/fetch", json!({"nonce": "", "id": 9}))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Banner not found");
}

#[tokio::test]
async fn test_delete_removes_banner() {
    let router = dev_router();
    let id = create_banner(&router, "", "Home", "home").await;

    let response = send(&router, post_json("/admin/banners/delete", json!({"nonce": "", "id": id}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Banner deleted successfully");

    let response = send(&router, post_json("/admin/banners/fetch", json!({"nonce": "", "id": id}))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&router, post_json("/admin/banners/delete", json!({"nonce": "", "id": id}))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_rows() {
    let router = dev_router();
    create_banner(&router, "", "Home", "home").await;
    create_banner(&router, "", "Promo", "promo").await;

    let json = body_json(send(&router, post_json("/admin/banners/list", json!({"nonce": ""}))).await).await;
    assert_eq!(json["ok"], true);

    let rows = json["banners"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Newest first
    assert_eq!(rows[0]["slug"], "promo");
    assert_eq!(rows[1]["slug"], "home");
    assert_eq!(rows[1]["shortcode"], r#"[abc_banner slug="home"]"#);
    assert_eq!(rows[1]["slide_count"], 3);
    assert!(rows[1]["created_at"].is_string());
}

#[tokio::test]
async fn test_list_empty() {
    let router = dev_router();
    let json = body_json(send(&router, post_json("/admin/banners/list", json!({"nonce": ""}))).await).await;
    assert_eq!(json["banners"], json!([]));
}
