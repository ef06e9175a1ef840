//! Integration tests for the HTTP lookup API.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use group_index::config::IndexConfig;
use group_index::index::new_shared_index;
use group_index::metrics::IndexMetrics;
use group_index::providers::{Bucketing, MemoryProvider, Record};
use group_index::server::api::{build_router, AppState};

fn make_app(max_groups: usize) -> Router {
    let records = [10, 20, 30, 110].map(|k| Record::new(k, json!({ "k": k })));
    let provider = MemoryProvider::new(records, Bucketing::new(100).unwrap());
    let config = IndexConfig {
        max_groups,
        ..Default::default()
    };

    build_router(Arc::new(AppState {
        index: new_shared_index(provider, &config),
        metrics: IndexMetrics::new().unwrap(),
        start_time: Instant::now(),
    }))
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, "GET", uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_find_returns_ceiling_entry() {
    let app = make_app(4);

    let (status, body) = get_json(&app, "/v1/find/15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], 15);
    assert_eq!(body["entry"]["key"], 20);
    assert_eq!(body["entry"]["value"], json!({ "k": 20 }));
    assert!(body["request_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_find_past_group_is_404() {
    let app = make_app(4);

    let (status, body) = get_json(&app, "/v1/find/31").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("31"));
}

#[tokio::test]
async fn test_find_load_failure_is_502() {
    let app = make_app(4);

    let (status, body) = get_json(&app, &format!("/v1/find/{}", i64::MAX)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("overflows"));
}

#[tokio::test]
async fn test_find_bad_key_is_400() {
    let app = make_app(4);

    let (status, _) = send(&app, "GET", "/v1/find/yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_and_clear() {
    let app = make_app(1);

    get_json(&app, "/v1/find/10").await;
    get_json(&app, "/v1/find/20").await;
    get_json(&app, "/v1/find/110").await;

    let (status, stats) = get_json(&app, "/v1/index/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["max_groups"], 1);
    assert_eq!(stats["policy"], "on_load");
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 2);
    assert_eq!(stats["evictions"], 1);
    assert_eq!(stats["cached_groups"], 1);
    assert_eq!(stats["recency"], json!(["BucketId(1)"]));

    let (status, body) = send(&app, "POST", "/v1/index/clear").await;
    assert_eq!(status, StatusCode::OK);
    let cleared: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(cleared["cached_groups"], 0);
    assert_eq!(cleared["recency"], json!([]));
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = make_app(4);
    get_json(&app, "/v1/find/10").await;

    let (status, health) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert!(health["provider"].as_str().unwrap().starts_with("memory"));
    assert_eq!(health["index"]["cached_groups"], 1);

    let (status, body) = send(&app, "GET", "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("group_index_misses 1"));
    assert!(text.contains("group_index_cached_entries 3"));
}
