//! HTTP lookup API over a shared index.
//!
//! - GET /v1/find/{key}
//! - GET /v1/index/stats
//! - POST /v1/index/clear
//! - GET /health
//! - GET /metrics

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RecencyPolicy;
use crate::index::{ApproximateIndex, GroupProvider, IndexStats, SharedIndex};
use crate::metrics::IndexMetrics;
use crate::providers::Record;

/// Application state shared across handlers.
pub struct AppState<P: GroupProvider> {
    pub index: SharedIndex<P>,
    pub metrics: IndexMetrics,
    pub start_time: Instant,
}

/// Build the axum router with all API routes.
pub fn build_router<P>(state: Arc<AppState<P>>) -> Router
where
    P: GroupProvider<Key = i64, Entry = Record> + Send + Sync + 'static,
    P::GroupId: Send + Sync + 'static,
{
    Router::new()
        .route("/v1/find/{key}", get(find::<P>))
        .route("/v1/index/stats", get(index_stats::<P>))
        .route("/v1/index/clear", post(clear::<P>))
        .route("/health", get(health::<P>))
        .route("/metrics", get(metrics::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─── Request/Response Types ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FindResponse {
    pub request_id: String,
    pub key: i64,
    pub entry: Record,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub max_groups: usize,
    pub policy: RecencyPolicy,
    /// Group ids, most recent first.
    pub recency: Vec<String>,
    #[serde(flatten)]
    pub stats: IndexStats,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub provider: String,
    pub index: StatsResponse,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error response: status code plus a JSON `{"error": ..}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

fn stats_response<P: GroupProvider>(index: &ApproximateIndex<P>) -> StatsResponse {
    StatsResponse {
        max_groups: index.max_groups(),
        policy: index.policy(),
        recency: index.recency().iter().map(|g| format!("{g:?}")).collect(),
        stats: index.stats(),
    }
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn find<P>(
    State(state): State<Arc<AppState<P>>>,
    Path(key): Path<i64>,
) -> Result<Json<FindResponse>, ApiError>
where
    P: GroupProvider<Key = i64, Entry = Record> + Send + Sync + 'static,
    P::GroupId: Send + Sync + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    let (result, stats) = {
        let mut index = state.index.write().await;
        let result = index.find(&key).map(|entry| entry.clone());
        (result, index.stats())
    };
    state.metrics.observe(&stats);

    match result {
        Ok(entry) => {
            info!(request_id = %request_id, key, entry_key = entry.key, "Find");
            Ok(Json(FindResponse {
                request_id,
                key,
                entry,
            }))
        }
        Err(e) if e.is_not_found() => {
            info!(request_id = %request_id, key, "Find: no entry");
            Err(ApiError::new(StatusCode::NOT_FOUND, e.to_string()))
        }
        Err(e) => {
            warn!(request_id = %request_id, key, error = %e, "Find failed");
            Err(ApiError::new(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

async fn index_stats<P>(State(state): State<Arc<AppState<P>>>) -> Json<StatsResponse>
where
    P: GroupProvider<Key = i64, Entry = Record> + Send + Sync + 'static,
    P::GroupId: Send + Sync + 'static,
{
    let index = state.index.read().await;
    Json(stats_response(&*index))
}

async fn clear<P>(State(state): State<Arc<AppState<P>>>) -> Json<StatsResponse>
where
    P: GroupProvider<Key = i64, Entry = Record> + Send + Sync + 'static,
    P::GroupId: Send + Sync + 'static,
{
    let mut index = state.index.write().await;
    index.clear();
    info!("Index cleared");
    state.metrics.observe(&index.stats());
    Json(stats_response(&*index))
}

async fn health<P>(State(state): State<Arc<AppState<P>>>) -> Json<HealthResponse>
where
    P: GroupProvider<Key = i64, Entry = Record> + Send + Sync + 'static,
    P::GroupId: Send + Sync + 'static,
{
    let index = state.index.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        provider: index.provider().describe(),
        index: stats_response(&*index),
    })
}

async fn metrics<P>(State(state): State<Arc<AppState<P>>>) -> Result<impl IntoResponse, ApiError>
where
    P: GroupProvider<Key = i64, Entry = Record> + Send + Sync + 'static,
    P::GroupId: Send + Sync + 'static,
{
    let stats = state.index.read().await.stats();
    state.metrics.observe(&stats);
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
