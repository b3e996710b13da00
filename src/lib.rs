//! # Banner Carousel
//!
//! Slug-addressed image carousel banners for content pages.
//!
//! Administrators build banners (an ordered list of image slides plus display
//! settings) through a nonce-protected JSON RPC surface. Pages embed a banner
//! with `[abc_banner slug="home"]`; the renderer expands the tag into a
//! carousel HTML fragment, and the headless [`carousel`] widget drives
//! navigation, autoplay, swipe and lazy image loading on a virtual clock.
//!
//! ## Architecture
//!
//! - [`banner`] - Banner records, settings and slug rules
//! - [`store`] - Storage backends and the slug-cached registry
//! - [`admin`] - Admin RPC bodies, operations and editor drafts
//! - [`render`] - Embed expansion and the HTML fragment
//! - [`carousel`] - The carousel state machine and its async driver
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use banner_carousel::{create_router, BannerRegistry, MemoryBannerStore, RouterConfig, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = BannerRegistry::new(MemoryBannerStore::new());
//!     let router = create_router(registry, Settings::default(), RouterConfig::new("secret"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod admin;
pub mod banner;
pub mod carousel;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use admin::{BannerDraft, BannerSummary, RpcResponse, SaveRequest};
pub use banner::{Banner, BannerData, Breakpoint, Settings, SettingsOverride, Slide};
pub use carousel::{Carousel, CarouselEvent, CarouselMount, CarouselSnapshot};
pub use config::{Cli, Command, ServeConfig, TokenConfig, TokenOutputFormat};
pub use error::{AdminError, NonceError, StoreError, ValidationError};
pub use render::{expand_content, render_banner, ExpandedContent, RenderPayload};
pub use server::{create_dev_router, create_router, AppState, NonceAuth, RouterConfig};
pub use store::{
    AnyBannerStore, BannerRegistry, BannerStore, JsonFileBannerStore, MemoryBannerStore,
};
