//! HTTP boundary for the ingest and query handlers.
//!
//! Endpoints:
//! - `GET /api/health`: liveness check
//! - `GET /api/logs?limit=N`: most recent records as a JSON array of `{id, message}`
//! - `POST /api/events`: ingest one trigger payload (any JSON shape, or empty)
//!
//! Store failures answer `500` with a fixed body; no store details leave
//! the process.

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{HandlerError, IngestHandler, QueryHandler};
use crate::record::Record;

/// Status text returned after a successful ingest.
pub const LOG_STORED: &str = "Log stored";

/// Error body returned on store failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestHandler>,
    pub query: Arc<QueryHandler>,
}

impl AppState {
    pub fn new(ingest: Arc<IngestHandler>, query: Arc<QueryHandler>) -> Self {
        Self { ingest, query }
    }
}

/// Start the HTTP server on `addr` and run until `shutdown` resolves.
///
/// When the port is 0, the OS assigns an ephemeral port. The actual bound
/// port is always logged so it can be discovered.
pub async fn serve<F>(
    state: AppState,
    addr: &str,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_port = listener.local_addr()?.port();
    info!(port = actual_port, "cost-tracker API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: AppState) -> Router {
    // The dashboard is a static page served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/logs", get(list_logs))
        .route("/api/events", post(ingest_event))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct LogsParams {
    limit: Option<u32>,
}

async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogsParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.query.query(params.limit).await?;
    Ok(Json(records))
}

async fn ingest_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let record = state.ingest.ingest_body(&body).await?;

    Ok(Json(IngestResponse {
        status: LOG_STORED,
        id: record.id,
    }))
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
struct IngestResponse {
    status: &'static str,
    id: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Handler failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(HandlerError);

impl From<HandlerError> for ApiError {
    fn from(err: HandlerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            HandlerError::StoreUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: INTERNAL_ERROR_MESSAGE,
                }),
            )
                .into_response(),
        }
    }
}
