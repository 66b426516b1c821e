//! JSON HTTP surface over the planner.
//!
//! One Axum router; each planning view contributes its routes. Handlers lock
//! the shared planner for the duration of a request, so mutations and their
//! remote writes run one at a time.

pub mod budget;
pub mod calendar;
pub mod diary;
pub mod habits;
pub mod todos;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::error::Error;
use crate::planner::Planner;
use crate::record::LocalId;

/// Shared state for all planner routes.
#[derive(Clone)]
pub struct ApiState {
    pub planner: Arc<Mutex<Planner>>,
}

/// Build the Axum router with every planner route.
pub fn planner_routes(planner: Arc<Mutex<Planner>>) -> Router {
    let state = ApiState { planner };

    Router::new()
        .route("/health", get(health))
        .route("/api/sync", post(sync_pending))
        .merge(todos::routes())
        .merge(budget::routes())
        .merge(habits::routes())
        .merge(diary::routes())
        .merge(calendar::routes())
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Navigation direction in `/…/prev` and `/…/next` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Error response for planner routes.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Planner(Error),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Planner(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Planner(e) => {
                let status = match &e {
                    Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    Error::NotFound { .. } => StatusCode::NOT_FOUND,
                    Error::Store(_) => StatusCode::BAD_GATEWAY,
                    Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    warn!(status = status.as_u16(), error = %e, "Request failed");
                }
                (status, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub(crate) fn parse_id(raw: &str) -> ApiResult<LocalId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid id: {raw}")))
}

// ── Health & sync ───────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "planboard"
    }))
}

async fn sync_pending(State(state): State<ApiState>) -> impl IntoResponse {
    let summary = state.planner.lock().await.sync_pending().await;
    Json(summary)
}
