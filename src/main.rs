//! Todo Service - a CRUD API with bearer/role authentication
//!
//! Composition root: opens the store and cache once, wires them into the
//! router state, and manages lifecycle from startup to graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_service::api::{create_router, AppState};
use todo_service::cache::{Cache, MemoryCache, RedisCache};
use todo_service::config::Config;
use todo_service::store;
use todo_service::tasks::spawn_cache_sweeper;

/// Main entry point for the todo service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the database pool and create the schema
/// 4. Select the cache backend (Redis when configured, in-process otherwise)
/// 5. Create the axum router with all endpoints
/// 6. Start the HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Todo Service");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_ttl={}s, eager_tasks={}",
        config.server_port, config.cache_ttl, config.eager_tasks
    );

    // Open the store and create the schema
    let pool = store::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;
    info!("Database ready at {}", config.database_url);

    // Select the cache backend. The in-process backend needs a periodic
    // sweeper; Redis expires keys on its own.
    let mut sweeper: Option<JoinHandle<()>> = None;
    let cache: Arc<dyn Cache> = match &config.redis_url {
        Some(url) => {
            let redis = RedisCache::connect(url)
                .await
                .with_context(|| format!("failed to connect to redis at {url}"))?;
            info!("Cache backend: redis at {url}");
            Arc::new(redis)
        }
        None => {
            let memory = MemoryCache::new();
            sweeper = Some(spawn_cache_sweeper(memory.clone(), config.cleanup_interval));
            info!("Cache backend: in-process (sweeper started)");
            Arc::new(memory)
        }
    };

    // Wire the application state and router
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = AppState::new(config, pool, cache);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cache sweeper (when one is running) and
/// allows graceful shutdown.
async fn shutdown_signal(sweeper: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    if let Some(handle) = sweeper {
        handle.abort();
        warn!("Cache sweeper aborted");
    }
}
