//! Banner Carousel - slug-addressed image carousel banners.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use banner_carousel::{
    config::{Cli, Command, ServeConfig, TokenConfig, TokenOutputFormat},
    server::{auth::NonceAuth, create_router, RouterConfig},
    store::{AnyBannerStore, BannerRegistry, JsonFileBannerStore, MemoryBannerStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => run_serve(config).await,
        Command::Token(config) => run_token(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let defaults = match config.load_default_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Banner Carousel v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");

    let store = match &config.data_file {
        Some(path) => match JsonFileBannerStore::open(path).await {
            Ok(store) => {
                info!("  Storage: {}", path.display());
                AnyBannerStore::File(store)
            }
            Err(e) => {
                error!("Failed to open banner file: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            warn!("  Storage: in-memory, banners are lost on exit");
            warn!("           Persist with --data-file=<path>");
            AnyBannerStore::Memory(MemoryBannerStore::new())
        }
    };

    if config.auth_enabled {
        info!("  Admin auth: enabled");
    } else {
        warn!("  Admin auth: DISABLED - admin endpoints accept any request");
        warn!("              Enable for production: --auth-enabled=true --admin-secret=<secret>");
    }
    info!("  Cache: {} banners, max-age {}s", config.cache_banners, config.cache_max_age);

    let registry = BannerRegistry::with_capacity(store, config.cache_banners);
    let router = create_router(registry, defaults, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    for line in listening_lines(&addr, config.auth_enabled) {
        info!("{}", line);
    }
    if config.auth_enabled {
        let auth = NonceAuth::new(config.admin_secret_or_empty());
        let token = auth.issue(Duration::from_secs(config.nonce_ttl));
        debug!("  Admin nonce (valid {}s): {}", config.nonce_ttl, token);
    }
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Startup lines logged at `info`. Admin nonces never appear here.
fn listening_lines(addr: &str, auth_enabled: bool) -> Vec<String> {
    let mut lines = vec![
        format!("  Server listening on: http://{}", addr),
        format!("    curl http://{}/health", addr),
        format!("    curl http://{}/banners/<slug>", addr),
    ];
    if auth_enabled {
        lines.push("  Admin nonces: banner-carousel token --secret <SECRET>".to_string());
    }
    lines
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "banner_carousel=debug,tower_http=debug"
    } else {
        "banner_carousel=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = if config.auth_enabled {
        RouterConfig::new(config.admin_secret_or_empty())
    } else {
        RouterConfig::without_auth()
    };

    router_config = router_config.with_cache_max_age(config.cache_max_age);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Token Command
// =============================================================================

fn run_token(config: TokenConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let auth = NonceAuth::new(&config.secret);
    let token = auth.issue(Duration::from_secs(config.ttl));

    match config.format {
        TokenOutputFormat::Token => {
            println!("{}", token);
        }
        TokenOutputFormat::Json => {
            let json = serde_json::json!({
                "nonce": token,
                "action": auth.action(),
                "expiry": NonceAuth::expiry_of(&token),
                "ttl": config.ttl,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
