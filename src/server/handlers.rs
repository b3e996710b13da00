//! HTTP request handlers for the banner service.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /banners/{slug}` - Banner HTML fragment
//! - `GET /banners/{slug}/payload` - Banner render payload as JSON
//! - `POST /render` - Expand embed tags in page content
//! - `POST /admin/banners/{save,fetch,delete,list}` - Admin RPC

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::admin::{
    self, DeleteRequest, FetchRequest, ListRequest, RpcResponse, SaveRequest, DELETED_MESSAGE,
    SAVED_MESSAGE,
};
use crate::banner::Settings;
use crate::error::{AdminError, NonceError, StoreError};
use crate::render::{self, EmbedFailure, ExpandedContent, RenderPayload};
use crate::store::{BannerRegistry, BannerStore};

use super::auth::NonceAuth;

/// Default Cache-Control max-age for rendered banners, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u32 = 60;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: BannerStore> {
    /// Banner store behind the slug cache
    pub registry: Arc<BannerRegistry<S>>,

    /// Settings every banner override is resolved against
    pub defaults: Arc<Settings>,

    /// Admin token verifier; `None` disables token checks
    pub auth: Option<NonceAuth>,

    /// Cache-Control max-age for public render responses
    pub cache_max_age: u32,
}

impl<S: BannerStore> AppState<S> {
    /// Create state with built-in default settings and no admin auth.
    pub fn new(registry: BannerRegistry<S>) -> Self {
        Self {
            registry: Arc::new(registry),
            defaults: Arc::new(Settings::default()),
            auth: None,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }

    pub fn with_defaults(mut self, defaults: Settings) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    /// Require admin tokens verified by `auth`.
    pub fn with_auth(mut self, auth: NonceAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Check an admin token, if tokens are required.
    pub fn check_nonce(&self, nonce: &str) -> Result<(), NonceError> {
        match &self.auth {
            Some(auth) => auth.verify(nonce),
            None => Ok(()),
        }
    }

    fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }
}

impl<S: BannerStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            defaults: Arc::clone(&self.defaults),
            auth: self.auth.clone(),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /render`.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub content: String,
}

/// JSON error response for the public endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "missing_slug")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Status, error type and client-facing message for an admin failure.
fn classify(err: &AdminError) -> (StatusCode, &'static str, String) {
    match err {
        AdminError::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        AdminError::Store(StoreError::NotFound { .. }) => (
            StatusCode::NOT_FOUND,
            "not_found",
            "Banner not found".to_string(),
        ),
        AdminError::Store(e @ StoreError::SlugTaken { .. }) => {
            (StatusCode::CONFLICT, "slug_taken", e.to_string())
        }
        AdminError::Store(StoreError::Io(_) | StoreError::Corrupt(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage_error",
            "Failed to save banner".to_string(),
        ),
        AdminError::Nonce(e) => {
            let (status, error_type) = e.status();
            (status, error_type, e.to_string())
        }
    }
}

/// Convert AdminError to an RPC failure response.
///
/// - 5xx errors are logged at ERROR level with the underlying cause
/// - 404s are logged at DEBUG level
/// - other 4xx errors are logged at WARN level
impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let err = match self {
            AdminError::Nonce(e) => return e.into_response(),
            other => other,
        };

        let (status, error_type, message) = classify(&err);

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                err
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                err
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        (status, Json(RpcResponse::failure(message))).into_response()
    }
}

/// Wrapper for payload lookup failures to implement IntoResponse.
pub struct PayloadError(pub EmbedFailure);

impl IntoResponse for PayloadError {
    fn into_response(self) -> Response {
        let (status, error_type) = match self.0 {
            EmbedFailure::MissingSlug => (StatusCode::BAD_REQUEST, "missing_slug"),
            EmbedFailure::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            EmbedFailure::NoSlides => (StatusCode::NOT_FOUND, "no_slides"),
        };
        let message = self.0.message();

        debug!(
            error_type = error_type,
            status = status.as_u16(),
            "Payload unavailable: {}",
            message
        );

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

impl From<EmbedFailure> for PayloadError {
    fn from(failure: EmbedFailure) -> Self {
        PayloadError(failure)
    }
}

// =============================================================================
// Public Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Render a banner as an HTML fragment.
///
/// # Endpoint
///
/// `GET /banners/{slug}`
///
/// # Response
///
/// Always `200 OK` with `Content-Type: text/html`. An unknown slug or a
/// banner without slides renders as `<p class="abc-error">…</p>` so the
/// embedding page still renders.
pub async fn banner_html_handler<S: BannerStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Response {
    let html = render::render_banner(&state.registry, &state.defaults, Some(&slug)).await;
    (
        [(header::CACHE_CONTROL, state.cache_control())],
        Html(html),
    )
        .into_response()
}

/// Return the render payload the carousel widget is built from.
///
/// # Endpoint
///
/// `GET /banners/{slug}/payload`
///
/// # Response
///
/// - `200 OK`: `{ slug, settings, slides: [...] }`
/// - `404 Not Found`: unknown slug or banner without slides
pub async fn banner_payload_handler<S: BannerStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Result<Response, PayloadError> {
    let payload: RenderPayload =
        render::resolve_embed(&state.registry, &state.defaults, Some(&slug)).await?;
    Ok((
        [(header::CACHE_CONTROL, state.cache_control())],
        Json(payload),
    )
        .into_response())
}

/// Expand every embed tag in a piece of content.
///
/// # Endpoint
///
/// `POST /render` with body `{ "content": "..." }`
///
/// # Response
///
/// `200 OK` with `{ "html": "...", "preload": "<link ...>" }`; `preload` is
/// omitted when the first named banner does not resolve.
pub async fn render_handler<S: BannerStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<RenderRequest>,
) -> Json<ExpandedContent> {
    Json(render::expand_content(&state.registry, &state.defaults, &request.content).await)
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// Create or update a banner.
///
/// # Endpoint
///
/// `POST /admin/banners/save`
///
/// # Response
///
/// - `200 OK`: `{ "ok": true, "message": "Banner saved successfully", "id": 1 }`
/// - `400 Bad Request`: validation failure, nothing is written
/// - `401 Unauthorized`: missing, expired or invalid nonce
/// - `404 Not Found`: `id` names no banner
/// - `409 Conflict`: slug owned by another banner
pub async fn save_handler<S: BannerStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<RpcResponse>, AdminError> {
    state.check_nonce(&request.nonce)?;
    let id = admin::save_banner(&state.registry, &request).await?;
    Ok(Json(RpcResponse::saved(id, SAVED_MESSAGE)))
}

/// Load one banner for editing.
///
/// # Endpoint
///
/// `POST /admin/banners/fetch`
pub async fn fetch_handler<S: BannerStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<RpcResponse>, AdminError> {
    state.check_nonce(&request.nonce)?;
    let banner = admin::fetch_banner(&state.registry, request.id).await?;
    Ok(Json(RpcResponse::banner(banner)))
}

/// Delete a banner.
///
/// # Endpoint
///
/// `POST /admin/banners/delete`
pub async fn delete_handler<S: BannerStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<RpcResponse>, AdminError> {
    state.check_nonce(&request.nonce)?;
    admin::delete_banner(&state.registry, request.id).await?;
    Ok(Json(RpcResponse::message(DELETED_MESSAGE)))
}

/// List every banner, newest first.
///
/// # Endpoint
///
/// `POST /admin/banners/list`
pub async fn list_handler<S: BannerStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<ListRequest>,
) -> Result<Json<RpcResponse>, AdminError> {
    state.check_nonce(&request.nonce)?;
    let banners = admin::list_banners(&state.registry).await?;
    Ok(Json(RpcResponse::listing(banners)))
}

// =============================================================================
// Tests
// =============================================================================
