//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::core::{default_period_label, Insight, SyncEngine, SyncOutcome};
use crate::error::{TasklyticsError, TasklyticsResult};
use crate::excel::SourceReader;
use crate::types::{GrowthRecord, Table};

use super::server::AppState;

/// Header carrying the shared secret for `POST /api/sync`
pub const SYNC_SECRET_HEADER: &str = "x-sync-secret";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Tasklytics API Server".to_string(),
        version: state.version.clone(),
        description: "Sales dashboard data and incremental sheet sync".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("GET", "/api/data", "Growth records for the latest period"),
            EndpointInfo::new("GET", "/api/insight", "Text insight over the latest period"),
            EndpointInfo::new("POST", "/api/sync", "Append the current source as a new period"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        backend: state.backend.describe(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "data".to_string(),
            "insight".to_string(),
            "sync".to_string(),
        ],
    }))
}

async fn load_growth(state: &AppState) -> TasklyticsResult<Vec<GrowthRecord>> {
    let engine = SyncEngine::new(state.backend.as_ref(), state.config.sync.clone())?;
    engine.growth().await
}

/// GET /api/data - Growth records; `[]` when the sheet is unreachable or empty
pub async fn data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match load_growth(&state).await {
        Ok(records) => Json(records),
        Err(e) => {
            warn!("growth view unavailable: {}", e);
            Json(Vec::new())
        }
    }
}

async fn load_insight(state: &AppState) -> TasklyticsResult<Insight> {
    let engine = SyncEngine::new(state.backend.as_ref(), state.config.sync.clone())?;
    engine.insight().await
}

/// Insight response
#[derive(Serialize)]
pub struct InsightResponse {
    pub insight: String,
    pub updated: String,
}

/// GET /api/insight - Leader, share and spread of the latest period
pub async fn insight(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = match load_insight(&state).await {
        Ok(insight) => InsightResponse {
            insight: insight.text,
            updated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        Err(e) => {
            warn!("insight unavailable: {}", e);
            InsightResponse {
                insight: crate::core::NO_DATA_INSIGHT.to_string(),
                updated: "Error".to_string(),
            }
        }
    };
    Json(ApiResponse::ok(response))
}

/// Sync request; every field is optional
#[derive(Deserialize, Default)]
pub struct SyncRequest {
    #[serde(default)]
    pub label: Option<String>,
}

/// Sync response
#[derive(Serialize, Default)]
pub struct SyncResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncResponse {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Success { column, label, .. } => Self {
                ok: true,
                written_column: Some(column),
                header: Some(label),
                error: None,
            },
            other => Self::failed(other.to_string()),
        }
    }
}

fn secret_matches(expected: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    headers
        .get(SYNC_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|given| given == expected)
}

async fn read_source(state: &AppState) -> TasklyticsResult<Table> {
    let path = state.config.source.clone();
    tokio::task::spawn_blocking(move || SourceReader::new(path).read())
        .await
        .map_err(|e| TasklyticsError::Io(std::io::Error::other(e.to_string())))?
}

async fn run_sync(state: &AppState, label: &str) -> TasklyticsResult<SyncOutcome> {
    let source = read_source(state).await?;
    let engine = SyncEngine::new(state.backend.as_ref(), state.config.sync.clone())?;
    engine.sync_from_source(&source, label).await
}

/// POST /api/sync - Run one incremental sync from the configured source
pub async fn sync(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<SyncRequest>>,
) -> impl IntoResponse {
    if !secret_matches(state.config.sync_secret.as_deref(), &headers) {
        warn!("rejected sync request with missing or wrong secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(SyncResponse::failed("unauthorized")),
        );
    }

    let request = body.map(|Json(r)| r).unwrap_or_default();
    let label = request
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| default_period_label(&state.config.sync.label_format));

    let _guard = state.sync_lock.lock().await;

    match run_sync(&state, &label).await {
        Ok(outcome) => (StatusCode::OK, Json(SyncResponse::from(outcome))),
        Err(e) if e.is_transport() => {
            warn!("sync failed talking to the sheet: {}", e);
            (StatusCode::BAD_GATEWAY, Json(SyncResponse::failed(e.to_string())))
        }
        Err(e) => {
            error!("sync failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SyncResponse::failed(e.to_string())),
            )
        }
    }
}
