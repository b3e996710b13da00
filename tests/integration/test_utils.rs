//! Test utilities for integration tests.
//!
//! This module provides a call-counting store and helpers for building
//! requests and reading responses.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use banner_carousel::banner::{Banner, BannerData};
use banner_carousel::error::StoreError;
use banner_carousel::store::{BannerStore, MemoryBannerStore};

// =============================================================================
// Counting Store
// =============================================================================

/// An in-memory store that counts every call made to it.
///
/// The counter is shared, so it can still be read after the store has been
/// moved into a router.
pub struct CountingStore {
    inner: MemoryBannerStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryBannerStore::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for CountingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BannerStore for CountingStore {
    async fn create(&self, data: BannerData) -> Result<u64, StoreError> {
        self.record();
        self.inner.create(data).await
    }

    async fn update(&self, id: u64, data: BannerData) -> Result<(), StoreError> {
        self.record();
        self.inner.update(id, data).await
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Banner>, StoreError> {
        self.record();
        self.inner.get_by_id(id).await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Banner>, StoreError> {
        self.record();
        self.inner.get_by_slug(slug).await
    }

    async fn list_all(&self) -> Result<Vec<Banner>, StoreError> {
        self.record();
        self.inner.list_all().await
    }

    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.record();
        self.inner.delete(id).await
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Three slides: the first with a link and title, the last with alt text.
pub fn three_slides() -> Value {
    json!([
        {"image": "https://example.com/one.jpg", "link": "https://example.com/sale", "title": "Sale"},
        {"image": "https://example.com/two.jpg"},
        {"image": "https://example.com/three.jpg", "alt_text": "Third"}
    ])
}

/// Body for `POST /admin/banners/save`, encoding settings and slides as
/// JSON strings the way the editor does.
pub fn save_body(nonce: &str, name: &str, slug: &str, settings: Value, slides: Value) -> Value {
    json!({
        "nonce": nonce,
        "name": name,
        "slug": slug,
        "settings": settings.to_string(),
        "slides": slides.to_string(),
    })
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send one request through a clone of the router.
pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Save a banner through the router and return its id.
pub async fn create_banner(router: &Router, nonce: &str, name: &str, slug: &str) -> u64 {
    let body = save_body(nonce, name, slug, json!({}), three_slides());
    let response = send(router, post_json("/admin/banners/save", body)).await;
    let json = body_json(response).await;
    assert_eq!(json["ok"], true, "save failed: {}", json);
    json["id"].as_u64().unwrap()
}
