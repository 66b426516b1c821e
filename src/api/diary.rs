//! `/api/diary` routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{ApiResult, ApiState, parse_id};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/diary", get(view).post(add))
        .route("/api/diary/{id}", delete(remove))
}

#[derive(Debug, Default, Deserialize)]
pub struct DiaryFilter {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub text: String,
}

async fn view(
    State(state): State<ApiState>,
    Query(filter): Query<DiaryFilter>,
) -> impl IntoResponse {
    Json(state.planner.lock().await.diary.view(filter.date))
}

async fn add(
    State(state): State<ApiState>,
    Json(body): Json<NewEntry>,
) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    let id = planner.diary.add(body.date, &body.text).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id, "view": planner.diary.view(None) })),
    ))
}

async fn remove(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let mut planner = state.planner.lock().await;
    planner.diary.delete(id).await?;
    Ok(Json(planner.diary.view(None)))
}
