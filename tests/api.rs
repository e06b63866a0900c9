//! HTTP boundary tests.
//!
//! Drives the axum router in-process against the memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cost_tracker::api::{router, AppState};
use cost_tracker::config::Config;
use cost_tracker::handlers::{IngestHandler, QueryHandler};
use cost_tracker::record::is_record_id;
use cost_tracker::storage::MemoryRecordStore;

fn app() -> (Arc<MemoryRecordStore>, Router) {
    let config = Config::for_test();
    let store = Arc::new(MemoryRecordStore::new());
    let state = AppState::new(
        Arc::new(IngestHandler::new(store.clone(), config.ingest)),
        Arc::new(QueryHandler::new(store.clone(), config.query)),
    );
    (store, router(state))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_event(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/events")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn post_alert(app: &Router, message: &str) -> String {
    let payload = json!({"Records": [{"Sns": {"Message": message}}]});
    let (status, body) = send(app, post_event(payload.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    // Keep ids distinct across consecutive posts
    tokio::time::sleep(Duration::from_millis(2)).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (_store, app) = app();
    let (status, _) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ingest_sns_notification() {
    let (store, app) = app();

    let payload = json!({
        "Records": [{"EventSource": "aws:sns", "Sns": {"Message": "Test SNS Billing Alert"}}]
    });
    let (status, body) = send(&app, post_event(payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Log stored");
    let id = body["id"].as_str().unwrap();
    assert!(is_record_id(id), "id: {id}");
    assert_eq!(store.get(id).await.unwrap().message, "Test SNS Billing Alert");
}

#[tokio::test]
async fn test_ingest_without_payload_stores_default() {
    let (store, app) = app();

    for body in ["", "{}", "not json at all"] {
        let (status, resp) = send(&app, post_event(body)).await;
        assert_eq!(status, StatusCode::OK, "body: {body:?}");
        let id = resp["id"].as_str().unwrap();
        assert_eq!(store.get(id).await.unwrap().message, "Test alert");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn test_query_returns_newest_first() {
    let (_store, app) = app();
    post_alert(&app, "T1").await;
    let t2 = post_alert(&app, "T2").await;
    let t3 = post_alert(&app, "T3").await;

    let (status, body) = send(&app, get("/api/logs?limit=2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": t3, "message": "T3"},
            {"id": t2, "message": "T2"}
        ])
    );
}

#[tokio::test]
async fn test_query_content_type_is_json() {
    let (_store, app) = app();
    let resp = app.oneshot(get("/api/logs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_query_empty_store() {
    let (_store, app) = app();
    let (status, body) = send(&app, get("/api/logs?limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_query_zero_limit() {
    let (_store, app) = app();
    post_alert(&app, "ignored").await;

    let (status, body) = send(&app, get("/api/logs?limit=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_query_default_limit() {
    let (_store, app) = app();
    for i in 0..12 {
        post_alert(&app, &format!("alert {i}")).await;
    }

    let (status, body) = send(&app, get("/api/logs")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["message"], "alert 11");
}

#[tokio::test]
async fn test_query_rejects_non_numeric_limit() {
    let (_store, app) = app();
    for uri in ["/api/logs?limit=abc", "/api/logs?limit=-1"] {
        let resp = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
    }
}

#[tokio::test]
async fn test_store_failure_is_generic_server_error() {
    let (store, app) = app();
    store.set_fail_on_scan(true).await;
    store.set_fail_on_put(true).await;

    let (status, body) = send(&app, get("/api/logs")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "internal server error"}));

    let (status, body) = send(&app, post_event("{}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "internal server error"}));
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let (_store, app) = app();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/logs")
        .header(header::ORIGIN, "https://dashboard.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
