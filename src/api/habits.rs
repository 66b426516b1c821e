//! `/api/habits` routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::{ApiResult, ApiState, Direction, parse_id};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/habits", get(view).post(add))
        .route("/api/habits/week", delete(delete_week))
        .route("/api/habits/week/{direction}", post(navigate))
        .route("/api/habits/{id}", put(rename).delete(remove))
        .route("/api/habits/{id}/days/{day}", post(set_day))
}

#[derive(Debug, Deserialize)]
pub struct HabitName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DayState {
    pub done: bool,
}

async fn view(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.planner.lock().await.habits.view())
}

async fn add(
    State(state): State<ApiState>,
    Json(body): Json<HabitName>,
) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    let id = planner.habits.add(&body.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id, "view": planner.habits.view() })),
    ))
}

async fn set_day(
    State(state): State<ApiState>,
    Path((id, day)): Path<(String, usize)>,
    Json(body): Json<DayState>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    planner.habits.set_day(id, day, body.done).await?;
    Ok(Json(planner.habits.view()))
}

async fn rename(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<HabitName>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    planner.habits.rename(id, &body.name).await?;
    Ok(Json(planner.habits.view()))
}

async fn remove(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    planner.habits.delete(id).await?;
    Ok(Json(planner.habits.view()))
}

async fn delete_week(State(state): State<ApiState>) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    let removed = planner.habits.delete_week().await?;
    Ok(Json(serde_json::json!({ "removed": removed, "view": planner.habits.view() })))
}

async fn navigate(
    State(state): State<ApiState>,
    Path(direction): Path<Direction>,
) -> impl IntoResponse {
    let mut planner = state.planner.lock().await;
    match direction {
        Direction::Prev => planner.habits.prev_week(),
        Direction::Next => planner.habits.next_week(),
    };
    Json(planner.habits.view())
}
