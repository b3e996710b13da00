//! Router configuration for the banner service.
//!
//! This module defines the HTTP routes and applies CORS and tracing
//! middleware.
//!
//! # Route Structure
//!
//! ```text
//! /health                       - Health check
//! /banners/{slug}               - Banner HTML fragment
//! /banners/{slug}/payload       - Banner render payload (JSON)
//! /render                       - Expand embed tags in content
//! /admin/banners/save           - Create or update (nonce in body)
//! /admin/banners/fetch          - Load one banner (nonce in body)
//! /admin/banners/delete         - Delete (nonce in body)
//! /admin/banners/list           - List all (nonce in body)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use banner_carousel::banner::Settings;
//! use banner_carousel::server::routes::{create_router, RouterConfig};
//! use banner_carousel::store::{BannerRegistry, MemoryBannerStore};
//!
//! let registry = BannerRegistry::new(MemoryBannerStore::new());
//! let config = RouterConfig::new("my-secret-key")
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(registry, Settings::default(), config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::NonceAuth;
use super::handlers::{
    banner_html_handler, banner_payload_handler, delete_handler, fetch_handler, health_handler,
    list_handler, render_handler, save_handler, AppState, DEFAULT_CACHE_MAX_AGE,
};
use crate::banner::Settings;
use crate::store::{BannerRegistry, BannerStore};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret key admin nonces are signed with
    pub admin_secret: String,

    /// Whether admin requests must carry a valid nonce
    pub auth_enabled: bool,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds for rendered banners
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given admin secret.
    ///
    /// By default:
    /// - Admin nonces are required
    /// - CORS allows any origin
    /// - Cache max-age is 60 seconds
    /// - Tracing is enabled
    pub fn new(admin_secret: impl Into<String>) -> Self {
        Self {
            admin_secret: admin_secret.into(),
            auth_enabled: true,
            cors_origins: None,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            enable_tracing: true,
        }
    }

    /// Create a configuration that accepts admin requests without a nonce.
    ///
    /// **Warning**: This should only be used for development/testing.
    pub fn without_auth() -> Self {
        Self {
            auth_enabled: false,
            ..Self::new(String::new())
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable nonce checks on admin requests.
    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `registry` - Banner registry the handlers read and write through
/// * `defaults` - Settings banner overrides are resolved against
/// * `config` - Router configuration
pub fn create_router<S>(registry: BannerRegistry<S>, defaults: Settings, config: RouterConfig) -> Router
where
    S: BannerStore + 'static,
{
    let mut app_state = AppState::new(registry)
        .with_defaults(defaults)
        .with_cache_max_age(config.cache_max_age);
    if config.auth_enabled {
        app_state = app_state.with_auth(NonceAuth::new(&config.admin_secret));
    }

    let cors = build_cors_layer(&config);

    let admin_routes = Router::new()
        .route("/save", post(save_handler::<S>))
        .route("/fetch", post(fetch_handler::<S>))
        .route("/delete", post(delete_handler::<S>))
        .route("/list", post(list_handler::<S>))
        .with_state(app_state.clone());

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/banners/{slug}", get(banner_html_handler::<S>))
        .route("/banners/{slug}/payload", get(banner_payload_handler::<S>))
        .route("/render", post(render_handler::<S>))
        .with_state(app_state)
        .nest("/admin/banners", admin_routes)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

/// Create a development router with built-in defaults and no admin nonces.
///
/// **Warning**: This should only be used for local development and testing.
pub fn create_dev_router<S>(registry: BannerRegistry<S>) -> Router
where
    S: BannerStore + 'static,
{
    create_router(registry, Settings::default(), RouterConfig::without_auth())
}

// =============================================================================
// Tests
// =============================================================================
