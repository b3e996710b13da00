//! HTTP server layer for the banner service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     GET /banners/{slug}    POST /render    POST /admin/...      │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │   (nonce)   │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{NonceAuth, ADMIN_ACTION, DEFAULT_NONCE_TTL};
pub use handlers::{
    banner_html_handler, banner_payload_handler, delete_handler, fetch_handler, health_handler,
    list_handler, render_handler, save_handler, AppState, ErrorResponse, HealthResponse,
    PayloadError, RenderRequest, DEFAULT_CACHE_MAX_AGE,
};
pub use routes::{create_dev_router, create_router, RouterConfig};
