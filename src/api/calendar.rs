//! `/api/calendar` routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{ApiResult, ApiState, Direction, parse_id};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/calendar", get(month_view).post(add))
        .route("/api/calendar/day/{date}", get(day_view))
        .route("/api/calendar/month/{direction}", post(navigate))
        .route("/api/calendar/{id}", delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct NewEvent {
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub note: String,
}

async fn month_view(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.planner.lock().await.calendar.month_view())
}

async fn day_view(
    State(state): State<ApiState>,
    Path(date): Path<NaiveDate>,
) -> impl IntoResponse {
    Json(state.planner.lock().await.calendar.day_view(date))
}

async fn add(
    State(state): State<ApiState>,
    Json(body): Json<NewEvent>,
) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    let id = planner.calendar.add(body.date, &body.title, &body.note).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id, "day": planner.calendar.day_view(body.date) })),
    ))
}

async fn remove(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    planner.calendar.delete(id).await?;
    Ok(Json(planner.calendar.month_view()))
}

async fn navigate(
    State(state): State<ApiState>,
    Path(direction): Path<Direction>,
) -> impl IntoResponse {
    let mut planner = state.planner.lock().await;
    match direction {
        Direction::Prev => planner.calendar.prev_month(),
        Direction::Next => planner.calendar.next_month(),
    };
    Json(planner.calendar.month_view())
}
