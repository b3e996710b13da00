//! Public rendering integration tests.
//!
//! Tests verify:
//! - The HTML fragment for a banner and the inline error markers
//! - The JSON render payload and its image loading hints
//! - Embed expansion with the preload hint
//! - Cache invalidation after admin writes
//! - Persistence with the JSON file store

use axum::http::StatusCode;
use serde_json::json;

use banner_carousel::store::{BannerRegistry, JsonFileBannerStore, MemoryBannerStore};
use banner_carousel::{create_dev_router, create_router, RouterConfig, Settings};

use super::test_utils::{
    body_json, body_text, create_banner, get, post_json, save_body, send, three_slides,
};

fn dev_router() -> axum::Router {
    create_dev_router(BannerRegistry::new(MemoryBannerStore::new()))
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = send(&dev_router(), get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// HTML Fragment
// =============================================================================

#[tokio::test]
async fn test_banner_html_fragment() {
    let router = dev_router();
    create_banner(&router, "", "Home", "home").await;

    let response = send(&router, get("/banners/home")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=60"
    );

    let html = body_text(response).await;
    assert!(html.starts_with(r#"<div class="abc-banner-carousel" data-slug="home""#));
    assert_eq!(html.matches(r#"class="abc-slide""#).count(), 3);
    assert!(html.contains(r#"<a href="https://example.com/sale" class="abc-slide-link">"#));
    assert!(html.contains(r#"<div class="abc-slide-title">Sale</div>"#));
    assert!(html.contains("abc-first-slide"));
    assert!(html.contains(r#"data-src="https://example.com/three.jpg""#));
    assert!(!html.contains(r#"data-src="https://example.com/one.jpg""#));
    // Default settings: arrows on, dots off
    assert!(html.contains("abc-carousel-prev"));
    assert!(!html.contains("abc-carousel-dots"));
}

#[tokio::test]
async fn test_banner_html_dots_follow_settings() {
    let router = dev_router();
    let body = save_body(
        "",
        "Home",
        "home",
        json!({"show_dots": true, "show_arrows": false}),
        three_slides(),
    );
    send(&router, post_json("/admin/banners/save", body)).await;

    let html = body_text(send(&router, get("/banners/home")).await).await;
    assert!(html.contains(r#"<button class="abc-dot active" data-index="0""#));
    assert_eq!(html.matches("abc-dot").count(), 3);
    assert!(!html.contains("abc-carousel-prev"));
}

#[tokio::test]
async fn test_less_than_in_title_is_kept_and_escaped() {
    let router = dev_router();
    let slides = json!([{"image": "https://example.com/one.jpg", "title": "Under < $50"}]);
    let body = save_body("", "Deals < $10", "deals", json!({}), slides);
    send(&router, post_json("/admin/banners/save", body)).await;

    let html = body_text(send(&router, get("/banners/deals")).await).await;
    assert!(html.contains(r#"<div class="abc-slide-title">Under &lt; $50</div>"#));

    let fetched = body_json(
        send(&router, post_json("/admin/banners/fetch", json!({"nonce": "", "id": 1}))).await,
    )
    .await;
    assert_eq!(fetched["banner"]["name"], "Deals < $10");
}

#[tokio::test]
async fn test_unknown_banner_renders_error_marker() {
    let response = send(&dev_router(), get("/banners/missing")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        r#"<p class="abc-error">Banner not found</p>"#
    );
}

#[tokio::test]
async fn test_slug_lookup_ignores_case() {
    let router = dev_router();
    create_banner(&router, "", "Home", "home").await;

    let html = body_text(send(&router, get("/banners/HOME")).await).await;
    assert!(html.contains("abc-banner-carousel"));
}

// =============================================================================
// Payload
// =============================================================================

#[tokio::test]
async fn test_banner_payload() {
    let router = dev_router();
    let body = save_body("", "Home", "home", json!({"autoplay": false}), three_slides());
    send(&router, post_json("/admin/banners/save", body)).await;

    let response = send(&router, get("/banners/home/payload")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["slug"], "home");
    assert_eq!(json["settings"]["autoplay"], false);
    assert_eq!(json["settings"]["autoplay_speed"], 5000);

    let slides = json["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 3);
    assert_eq!(slides[0]["loading"], "eager");
    assert_eq!(slides[0]["fetchpriority"], "high");
    assert_eq!(slides[0]["decoding"], "sync");
    assert_eq!(slides[1]["loading"], "eager");
    assert_eq!(slides[1]["fetchpriority"], "auto");
    assert_eq!(slides[1]["decoding"], "async");
    assert_eq!(slides[2]["loading"], "lazy");
    assert_eq!(slides[2]["alt_text"], "Third");
}

#[tokio::test]
async fn test_banner_payload_not_found() {
    let response = send(&dev_router(), get("/banners/missing/payload")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["message"], "Banner not found");
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_custom_defaults_and_cache_max_age() {
    let defaults = Settings {
        show_dots: true,
        ..Settings::default()
    };
    let router = create_router(
        BannerRegistry::new(MemoryBannerStore::new()),
        defaults,
        RouterConfig::without_auth().with_cache_max_age(300),
    );
    create_banner(&router, "", "Home", "home").await;

    let response = send(&router, get("/banners/home/payload")).await;
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=300"
    );
    assert_eq!(body_json(response).await["settings"]["show_dots"], true);
}

// =============================================================================
// Content Expansion
// =============================================================================

#[tokio::test]
async fn test_render_expands_every_embed() {
    let router = dev_router();
    create_banner(&router, "", "Home", "home").await;

    let content = r#"<h1>Hi</h1>[abc_banner slug="home"]<p>mid</p>[abc_banner slug='nope'][abc_banner]"#;
    let response = send(&router, post_json("/render", json!({"content": content}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let html = json["html"].as_str().unwrap();
    assert!(html.starts_with("<h1>Hi</h1><div class=\"abc-banner-carousel\""));
    assert!(html.contains("<p>mid</p>"));
    assert!(html.contains(r#"<p class="abc-error">Banner not found</p>"#));
    assert!(html.ends_with(r#"<p class="abc-error">Please specify a banner slug</p>"#));
    assert!(!html.contains("[abc_banner"));

    assert_eq!(
        json["preload"],
        r#"<link rel="preload" as="image" href="https://example.com/one.jpg" fetchpriority="high">"#
    );
}

#[tokio::test]
async fn test_render_without_embeds() {
    let response = send(
        &dev_router(),
        post_json("/render", json!({"content": "<p>plain</p>"})),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["html"], "<p>plain</p>");
    assert!(json.get("preload").is_none());
}

#[tokio::test]
async fn test_render_no_preload_when_first_banner_missing() {
    let router = dev_router();
    create_banner(&router, "", "Home", "home").await;

    let content = r#"[abc_banner slug="nope"][abc_banner slug="home"]"#;
    let json = body_json(send(&router, post_json("/render", json!({"content": content}))).await).await;
    assert!(json.get("preload").is_none());
    assert!(json["html"].as_str().unwrap().contains("abc-banner-carousel"));
}

// =============================================================================
// Cache Invalidation
// =============================================================================

#[tokio::test]
async fn test_render_reflects_updates_and_deletes() {
    let router = dev_router();
    let id = create_banner(&router, "", "Home", "home").await;

    // Warm the slug cache
    let html = body_text(send(&router, get("/banners/home")).await).await;
    assert_eq!(html.matches(r#"class="abc-slide""#).count(), 3);

    let mut body = save_body(
        "",
        "Home",
        "home",
        json!({}),
        json!([{"image": "https://example.com/only.jpg"}]),
    );
    body["id"] = json!(id);
    send(&router, post_json("/admin/banners/save", body)).await;

    let html = body_text(send(&router, get("/banners/home")).await).await;
    assert_eq!(html.matches(r#"class="abc-slide""#).count(), 1);
    assert!(html.contains("only.jpg"));

    send(&router, post_json("/admin/banners/delete", json!({"nonce": "", "id": id}))).await;
    let html = body_text(send(&router, get("/banners/home")).await).await;
    assert_eq!(html, r#"<p class="abc-error">Banner not found</p>"#);
}

#[tokio::test]
async fn test_renamed_slug_frees_old_one() {
    let router = dev_router();
    let id = create_banner(&router, "", "Home", "home").await;
    send(&router, get("/banners/home")).await;

    let mut body = save_body("", "Home", "landing", json!({}), three_slides());
    body["id"] = json!(id);
    send(&router, post_json("/admin/banners/save", body)).await;

    let html = body_text(send(&router, get("/banners/home")).await).await;
    assert_eq!(html, r#"<p class="abc-error">Banner not found</p>"#);
    let html = body_text(send(&router, get("/banners/landing")).await).await;
    assert!(html.contains("abc-banner-carousel"));
}

// =============================================================================
// File Store
// =============================================================================

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banners.json");

    {
        let store = JsonFileBannerStore::open(&path).await.unwrap();
        let router = create_dev_router(BannerRegistry::new(store));
        create_banner(&router, "", "Home", "home").await;
    }

    let store = JsonFileBannerStore::open(&path).await.unwrap();
    let router = create_dev_router(BannerRegistry::new(store));

    let html = body_text(send(&router, get("/banners/home")).await).await;
    assert!(html.contains("abc-banner-carousel"));

    // Ids keep counting after a restart
    let id = create_banner(&router, "", "Promo", "promo").await;
    assert_eq!(id, 2);
}
