//! Carousel widget integration tests.
//!
//! The widget is mounted from a payload served by the router, the way a
//! page script would mount it from the rendered fragment.

use std::time::Duration;

use axum::Router;
use serde_json::json;

use banner_carousel::carousel::driver;
use banner_carousel::render::RenderPayload;
use banner_carousel::store::{BannerRegistry, MemoryBannerStore};
use banner_carousel::{create_dev_router, Carousel, CarouselEvent};

use super::test_utils::{body_json, get, post_json, save_body, send, three_slides};

async fn served_payload(router: &Router, settings: serde_json::Value) -> RenderPayload {
    let body = save_body("", "Home", "home", settings, three_slides());
    send(router, post_json("/admin/banners/save", body)).await;

    let json = body_json(send(router, get("/banners/home/payload")).await).await;
    serde_json::from_value(json).unwrap()
}

fn dev_router() -> Router {
    create_dev_router(BannerRegistry::new(MemoryBannerStore::new()))
}

#[tokio::test]
async fn test_widget_navigation_and_autoplay() {
    let router = dev_router();
    let payload = served_payload(&router, json!({"show_dots": true})).await;

    let mut carousel = Carousel::from_payload(&payload, 1000.0, 1280.0);
    assert_eq!(carousel.slide_count(), 3);
    assert_eq!(carousel.active_dot(), Some(0));
    assert!(carousel.is_autoplay_armed());

    // Previous from the first slide wraps to the last
    assert!(carousel.handle(&CarouselEvent::PrevClick));
    assert_eq!(carousel.current_index(), 2);
    assert_eq!(carousel.active_dot(), Some(2));
    assert!(carousel.is_animating());

    carousel.advance(500);
    assert!(!carousel.is_animating());

    // First autoplay tick at 5000ms wraps forward to the first slide
    carousel.advance(4500);
    assert_eq!(carousel.current_index(), 0);
    assert_eq!(carousel.active_dot(), Some(0));
}

#[tokio::test]
async fn test_widget_lazy_loads_served_images() {
    let router = dev_router();
    let payload = served_payload(&router, json!({"autoplay": false})).await;

    let mut carousel = Carousel::from_payload(&payload, 1000.0, 1280.0);
    assert!(!carousel.is_autoplay_armed());
    assert!(!carousel.is_observing(0));
    assert!(!carousel.is_observing(1));
    assert!(carousel.is_observing(2));
    assert!(carousel.slides()[2].image.src.starts_with("data:image/svg+xml"));

    assert_eq!(carousel.intersect(&[1, 2]), vec![2]);
    assert_eq!(carousel.slides()[2].image.src, "https://example.com/three.jpg");
    assert!(carousel.intersect(&[2]).is_empty());
}

#[tokio::test]
async fn test_widget_applies_default_breakpoint() {
    let router = dev_router();
    let payload = served_payload(&router, json!({"autoplay": false})).await;

    let mut carousel = Carousel::from_payload(&payload, 1000.0, 1280.0);
    assert_eq!(carousel.slide_styles()[0].flex, "0 0 auto");

    carousel.resize(600.0, Some(600.0));
    assert_eq!(carousel.slide_styles()[0].flex, "0 0 100%");
    assert_eq!(carousel.slide_styles()[0].width, None);

    carousel.resize(1024.0, Some(1000.0));
    assert_eq!(carousel.slide_styles()[0].flex, "0 0 auto");
}

#[tokio::test]
async fn test_widget_mounted_on_narrow_viewport_uses_breakpoint() {
    let router = dev_router();
    let payload = served_payload(&router, json!({"autoplay": false})).await;

    let carousel = Carousel::from_payload(&payload, 600.0, 600.0);
    assert_eq!(carousel.slide_styles()[0].flex, "0 0 100%");
    assert_eq!(carousel.slide_styles()[0].width, None);
}

#[tokio::test(start_paused = true)]
async fn test_driver_runs_served_widget() {
    let router = dev_router();
    let payload = served_payload(&router, json!({"autoplay_speed": 1000, "show_dots": true})).await;

    let handle = driver::spawn(Carousel::from_payload(&payload, 1000.0, 1280.0));
    let mut snapshots = handle.subscribe();

    handle
        .send(CarouselEvent::DotClick { index: 1 })
        .await
        .unwrap();
    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow_and_update().current_index, 1);

    // Autoplay keeps advancing on the paused clock
    tokio::time::sleep(Duration::from_millis(1_050)).await;
    assert_eq!(handle.snapshot().current_index, 2);

    let last = handle.dispose().await;
    assert!(last.disposed);
    assert!(!last.autoplay_armed);
}
