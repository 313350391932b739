//! Tasklytics API Server binary
//!
//! HTTP API for the sales dashboard.
//! Provides growth data, insight and sync endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tasklytics::api::{run_api_server, ApiConfig, AppState};
use tasklytics::config::AppConfig;
use tasklytics::remote::open_backend;

#[derive(Parser, Debug)]
#[command(name = "tasklytics-server")]
#[command(version)]
#[command(about = "Tasklytics API Server - sales dashboard data and sheet sync over HTTP")]
#[command(long_about = r#"
Tasklytics API Server

Endpoints:
  - GET  /api/data     - Growth records for the latest period
  - GET  /api/insight  - Text insight over the latest period
  - POST /api/sync     - Append the configured source as a new period
                         (X-Sync-Secret header when sync_secret is set)

Additional endpoints:
  - GET  /health       - Health check
  - GET  /version      - Server version info
  - GET  /             - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - One sync in flight at a time

Example usage:
  tasklytics-server                            # Start on localhost:8080
  tasklytics-server --host 0.0.0.0 --port 3000 --config tasklytics.yaml

  curl -X POST http://localhost:8080/api/sync \
    -H "Content-Type: application/json" \
    -H "X-Sync-Secret: $TASKLYTICS_SYNC_SECRET" \
    -d '{"label": "2025-01-31"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "TASKLYTICS_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "TASKLYTICS_PORT")]
    port: u16,

    /// Config file (defaults to ./tasklytics.yaml when present)
    #[arg(short, long, env = "TASKLYTICS_CONFIG")]
    config: Option<PathBuf>,

    /// Use a local .xlsx workbook as the dashboard sheet
    #[arg(short, long)]
    workbook: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::load(args.config.as_deref())?;
    if let Some(workbook) = args.workbook {
        app_config = app_config.with_workbook(workbook);
    }
    let backend = open_backend(&app_config)?;

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config, AppState::new(app_config, Arc::from(backend))).await
}
