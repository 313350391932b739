//! Tasklytics API Server implementation
//!
//! HTTP API server using Axum for the sales dashboard front end.
//! Provides the growth data, the insight text and the sync trigger.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers;
use crate::config::AppConfig;
use crate::remote::SheetBackend;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub config: AppConfig,
    /// Built once at startup and shared by every request
    pub backend: Arc<dyn SheetBackend>,
    /// Held for the whole of a sync so runs never overlap
    pub sync_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn SheetBackend>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            backend,
            sync_lock: Mutex::new(()),
        }
    }
}

/// Build the router with all endpoints and middleware
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Dashboard endpoints
        .route("/api/data", get(handlers::data))
        .route("/api/insight", get(handlers::insight))
        .route("/api/sync", post(handlers::sync))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, state: AppState) -> anyhow::Result<()> {
    // Initialize tracing; a subscriber installed by the caller wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tasklytics_server=info,tasklytics=info,tower_http=info".into()
            }),
        )
        .try_init();

    let backend = state.backend.describe();
    let app = router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📊 Tasklytics API Server starting on http://{}", addr);
    info!("   Sheet: {}", backend);
    info!("   Endpoints: GET /api/data, GET /api/insight, POST /api/sync");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Tasklytics API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
