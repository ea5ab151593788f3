//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::audit::{self, RequestAudit};
use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// All routes, without the CORS / tracing layers added by `main`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/requests/:id/events", get(get_request_events))
        .route("/requests/:id/audit", get(get_request_audit))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub request_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(e: IndexerError) -> Response {
    error!("API query failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /requests/:id/events`
///
/// Returns all indexed events for the given request handle.
pub async fn get_request_events(
    State(state): State<Arc<ApiState>>,
    Path(request_id): Path<String>,
) -> Response {
    match db::get_events_for_request(&state.pool, &request_id).await {
        Ok(events) => {
            let count = events.len();
            (
                StatusCode::OK,
                Json(EventsResponse {
                    request_id,
                    count,
                    events,
                }),
            )
                .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /requests/:id/audit`
///
/// Replays the request's events into its ledger snapshot. `404` when nothing
/// has been indexed for the handle.
pub async fn get_request_audit(
    State(state): State<Arc<ApiState>>,
    Path(request_id): Path<String>,
) -> Response {
    match db::get_events_for_request(&state.pool, &request_id).await {
        Ok(events) if events.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no events indexed for request {request_id}"),
            }),
        )
            .into_response(),
        Ok(events) => {
            let report: RequestAudit = audit::replay(&request_id, &events);
            if !report.is_consistent() {
                warn!(
                    "Request {request_id} history has {} violation(s)",
                    report.violations.len()
                );
            }
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /events`
///
/// Returns all indexed events across all requests.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_all_events(&state.pool).await {
        Ok(events) => {
            let count = events.len();
            (StatusCode::OK, Json(AllEventsResponse { count, events })).into_response()
        }
        Err(e) => internal_error(e),
    }
}
