//! `/api/todos` routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::{ApiResult, ApiState, Direction, parse_id};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/todos", get(view).post(add))
        .route("/api/todos/week", delete(delete_week))
        .route("/api/todos/week/{direction}", post(navigate))
        .route("/api/todos/{id}", put(edit).delete(remove))
        .route("/api/todos/{id}/toggle", post(toggle))
}

#[derive(Debug, Deserialize)]
pub struct AddTodo {
    pub day: usize,
    pub text: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct EditTodo {
    pub text: String,
    #[serde(default)]
    pub note: String,
}

async fn view(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.planner.lock().await.todos.view())
}

async fn add(
    State(state): State<ApiState>,
    Json(body): Json<AddTodo>,
) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    let id = planner.todos.add(body.day, &body.text, &body.note).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id, "view": planner.todos.view() })),
    ))
}

async fn toggle(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    let done = planner.todos.toggle_done(id).await?;
    Ok(Json(serde_json::json!({ "id": id, "done": done })))
}

async fn edit(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<EditTodo>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    planner.todos.edit(id, &body.text, &body.note).await?;
    Ok(Json(planner.todos.view()))
}

async fn remove(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    planner.todos.delete(id).await?;
    Ok(Json(planner.todos.view()))
}

async fn delete_week(State(state): State<ApiState>) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    let removed = planner.todos.delete_week().await?;
    Ok(Json(serde_json::json!({ "removed": removed, "view": planner.todos.view() })))
}

async fn navigate(
    State(state): State<ApiState>,
    Path(direction): Path<Direction>,
) -> impl IntoResponse {
    let mut planner = state.planner.lock().await;
    match direction {
        Direction::Prev => planner.todos.prev_week(),
        Direction::Next => planner.todos.next_week(),
    };
    Json(planner.todos.view())
}
