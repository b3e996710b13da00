//! Anti-forgery tokens for the admin endpoints.
//!
//! Every admin request body carries a `nonce`: a short-lived token proving
//! the caller was issued it by someone holding the server secret.
//!
//! # Token Scheme
//!
//! ```text
//! signature = HMAC-SHA256(secret_key, "{action}:{expiry}")
//! token     = "{expiry}.{hex(signature)}"
//! ```
//!
//! `action` scopes a token to one purpose, so a token minted for another
//! use of the same secret is rejected. Expiry is Unix epoch seconds.
//!
//! # Example
//!
//! ```rust
//! use banner_carousel::server::auth::NonceAuth;
//! use std::time::Duration;
//!
//! let auth = NonceAuth::new("my-secret-key");
//! let token = auth.issue(Duration::from_secs(3600));
//! assert!(auth.verify(&token).is_ok());
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::admin::RpcResponse;
use crate::error::NonceError;

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Action the admin endpoints accept tokens for.
pub const ADMIN_ACTION: &str = "abc_admin_nonce";

/// Default token lifetime: one day.
pub const DEFAULT_NONCE_TTL: Duration = Duration::from_secs(86_400);

impl NonceError {
    /// HTTP status and machine-readable code for this failure.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            NonceError::Missing => (StatusCode::UNAUTHORIZED, "missing_nonce"),
            NonceError::Malformed => (StatusCode::BAD_REQUEST, "malformed_nonce"),
            NonceError::Expired { .. } => (StatusCode::UNAUTHORIZED, "nonce_expired"),
            NonceError::Invalid => (StatusCode::UNAUTHORIZED, "invalid_nonce"),
        }
    }
}

impl IntoResponse for NonceError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status();
        let message = self.to_string();

        // A bad signature may be forgery, the rest is routine
        match &self {
            NonceError::Invalid => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Admin token rejected: {}",
                    message
                );
            }
            _ => {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Admin token rejected: {}",
                    message
                );
            }
        }

        (status, Json(RpcResponse::failure(message))).into_response()
    }
}

// =============================================================================
// Token Issuer / Verifier
// =============================================================================

/// Issues and verifies admin tokens with HMAC-SHA256.
#[derive(Clone)]
pub struct NonceAuth {
    /// Secret key for HMAC computation
    secret_key: Vec<u8>,

    /// Purpose the tokens are bound to
    action: String,
}

impl NonceAuth {
    /// Create an authenticator for the admin action.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
            action: ADMIN_ACTION.to_string(),
        }
    }

    /// Bind tokens to a different action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Issue a token valid for `ttl` from now.
    pub fn issue(&self, ttl: Duration) -> String {
        self.issue_with_expiry(unix_now().saturating_add(ttl.as_secs()))
    }

    /// Issue a token that expires at a given Unix timestamp.
    pub fn issue_with_expiry(&self, expiry: u64) -> String {
        format!("{}.{}", expiry, self.compute_signature(expiry))
    }

    /// Verify a token.
    pub fn verify(&self, token: &str) -> Result<(), NonceError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(NonceError::Missing);
        }

        let (expiry, signature) = token.split_once('.').ok_or(NonceError::Malformed)?;
        let expiry: u64 = expiry.parse().map_err(|_| NonceError::Malformed)?;
        let provided_sig = hex::decode(signature).map_err(|_| NonceError::Malformed)?;

        let current_time = unix_now();
        if current_time > expiry {
            return Err(NonceError::Expired {
                expired_at: expiry,
                current_time,
            });
        }

        // Constant-time comparison
        let expected_sig = self.signature_bytes(expiry);
        if provided_sig.ct_eq(&expected_sig).into() {
            Ok(())
        } else {
            Err(NonceError::Invalid)
        }
    }

    /// Expiry timestamp encoded in a token, without verifying it.
    pub fn expiry_of(token: &str) -> Option<u64> {
        token.split_once('.')?.0.parse().ok()
    }

    fn compute_signature(&self, expiry: u64) -> String {
        hex::encode(self.signature_bytes(expiry))
    }

    fn signature_bytes(&self, expiry: u64) -> Vec<u8> {
        let message = format!("{}:{}", self.action, expiry);

        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(message.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for NonceAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceAuth")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// Tests
// =============================================================================
