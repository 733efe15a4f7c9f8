//! Property Catalog server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_catalog::api::create_router;
use property_catalog::cache::{CacheBackend, MemoryCacheBackend, RedisCacheBackend};
use property_catalog::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the catalog server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Select the cache backend (Redis when `REDIS_URL` is set)
/// 4. Start the TTL sweep for the in-process backend
/// 5. Serve the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Property Catalog server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_ttl={}s, namespace={}, max_entries={}",
        config.server_port, config.cache_ttl, config.cache_namespace, config.max_entries
    );
    if config.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }

    let (cache, cleanup_handle) = build_cache(&config).await?;
    let state = AppState::from_config(&config, cache).context("failed to build app state")?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Picks the cache backend. An unreachable Redis is logged, not fatal: the
/// catalog serves from the store until it comes back.
async fn build_cache(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheBackend>, Option<JoinHandle<()>>)> {
    match &config.redis_url {
        Some(url) => {
            let backend = RedisCacheBackend::open(url).context("invalid REDIS_URL")?;
            match backend.ping().await {
                Ok(true) => info!("Redis cache connected"),
                Ok(false) => warn!("Redis answered ping unexpectedly; continuing"),
                Err(e) => warn!(error = %e, "Redis unreachable; reads fall back to the store"),
            }
            Ok((Arc::new(backend), None))
        }
        None => {
            let backend = MemoryCacheBackend::new(config.max_entries);
            let handle = spawn_cleanup_task(backend.store(), config.cleanup_interval);
            info!("In-process cache initialized");
            Ok((Arc::new(backend), Some(handle)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
