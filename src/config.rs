//! Configuration management for the banner service.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `ABC_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use banner_carousel::config::{Cli, Command};
//! use clap::Parser;
//!
//! match Cli::parse().command {
//!     Command::Serve(config) => println!("Listening on {}", config.bind_address()),
//!     Command::Token(config) => println!("Token TTL: {}s", config.ttl),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `ABC_HOST` - Server bind address (default: 0.0.0.0)
//! - `ABC_PORT` - Server port (default: 3000)
//! - `ABC_DATA_FILE` - JSON file banners are persisted to (default: in-memory)
//! - `ABC_DEFAULT_SETTINGS` - JSON file overriding the built-in default settings
//! - `ABC_ADMIN_SECRET` - HMAC secret for admin nonces
//! - `ABC_AUTH_ENABLED` - Require admin nonces (default: true)
//! - `ABC_NONCE_TTL` - Lifetime of issued admin nonces in seconds (default: 86400)
//! - `ABC_CACHE_BANNERS` - Max banners in the slug cache (default: 100)
//! - `ABC_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 60)
//! - `ABC_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::banner::{Settings, SettingsOverride};
use crate::server::auth::DEFAULT_NONCE_TTL;
use crate::server::DEFAULT_CACHE_MAX_AGE;
use crate::store::DEFAULT_BANNER_CACHE_CAPACITY;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Banner Carousel - slug-addressed image carousel banners.
#[derive(Parser, Debug, Clone)]
#[command(name = "banner-carousel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeConfig),

    /// Issue an admin nonce for scripting against the admin endpoints.
    Token(TokenConfig),
}

/// Options for `serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "ABC_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "ABC_PORT")]
    pub port: u16,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// JSON file banners are persisted to.
    ///
    /// If not specified, banners live in memory and are lost on exit.
    #[arg(long, env = "ABC_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// JSON file with settings overriding the built-in defaults.
    ///
    /// Fields left out keep their built-in value.
    #[arg(long, env = "ABC_DEFAULT_SETTINGS")]
    pub default_settings: Option<PathBuf>,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Secret key admin nonces are signed with.
    ///
    /// If not provided and auth is enabled, the server will fail to start.
    #[arg(long, env = "ABC_ADMIN_SECRET")]
    pub admin_secret: Option<String>,

    /// Require a valid nonce on admin requests.
    ///
    /// WARNING: Only disable in development/testing.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "ABC_AUTH_ENABLED")]
    pub auth_enabled: bool,

    /// Lifetime in seconds of the admin nonce logged at startup.
    #[arg(long, default_value_t = DEFAULT_NONCE_TTL.as_secs(), env = "ABC_NONCE_TTL")]
    pub nonce_ttl: u64,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Maximum number of banners kept in the slug cache.
    #[arg(long, default_value_t = DEFAULT_BANNER_CACHE_CAPACITY, env = "ABC_CACHE_BANNERS")]
    pub cache_banners: usize,

    /// HTTP Cache-Control max-age in seconds for rendered banners.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "ABC_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "ABC_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_enabled && self.admin_secret.as_deref().map_or(true, str::is_empty) {
            return Err(
                "Admin auth is enabled but no secret provided. \
                 Set --admin-secret or ABC_ADMIN_SECRET, or disable auth with --auth-enabled=false"
                    .to_string(),
            );
        }

        if self.cache_banners == 0 {
            return Err("cache_banners must be greater than 0".to_string());
        }

        if self.nonce_ttl == 0 {
            return Err("nonce_ttl must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the admin secret, or an empty string when unset.
    pub fn admin_secret_or_empty(&self) -> &str {
        self.admin_secret.as_deref().unwrap_or("")
    }

    /// Resolve the process-wide default settings.
    ///
    /// The file holds a settings override applied on top of the built-in
    /// defaults. Without a file the built-in defaults are returned.
    pub fn load_default_settings(&self) -> Result<Settings, String> {
        let Some(path) = &self.default_settings else {
            return Ok(Settings::default());
        };

        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let over: SettingsOverride = serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid settings in {}: {}", path.display(), e))?;

        Ok(Settings::default().merged(&over))
    }
}

/// Output format for `token`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenOutputFormat {
    /// The bare token
    #[default]
    Token,

    /// Token, action and expiry as JSON
    Json,
}

/// Options for `token`.
#[derive(Args, Debug, Clone)]
pub struct TokenConfig {
    /// Secret key the server verifies nonces with.
    #[arg(long, env = "ABC_ADMIN_SECRET")]
    pub secret: String,

    /// Token lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_NONCE_TTL.as_secs())]
    pub ttl: u64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = TokenOutputFormat::Token)]
    pub format: TokenOutputFormat,
}

impl TokenConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("Secret must not be empty".to_string());
        }
        if self.ttl == 0 {
            return Err("ttl must be greater than 0".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
