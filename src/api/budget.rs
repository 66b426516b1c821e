//! `/api/budget` routes.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ApiResult, ApiState, Direction};
use crate::budget::LineKind;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/budget", get(view))
        .route("/api/budget/income", put(set_income))
        .route("/api/budget/savings", put(set_savings))
        .route("/api/budget/expenses", post(add_expense))
        .route("/api/budget/expenses/{index}", delete(remove_expense))
        .route("/api/budget/extra", post(add_extra))
        .route("/api/budget/extra/{index}", delete(remove_extra))
        .route("/api/budget/month/{direction}", post(navigate))
}

#[derive(Debug, Deserialize)]
pub struct Amount {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct NewLine {
    pub name: String,
    pub amount: Decimal,
}

async fn view(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.planner.lock().await.budget.view())
}

async fn set_income(
    State(state): State<ApiState>,
    Json(body): Json<Amount>,
) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    planner.budget.set_income(body.amount).await?;
    Ok(Json(planner.budget.view()))
}

async fn set_savings(
    State(state): State<ApiState>,
    Json(body): Json<Amount>,
) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    planner.budget.set_savings(body.amount).await?;
    Ok(Json(planner.budget.view()))
}

async fn add_line(state: ApiState, kind: LineKind, body: NewLine) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    match kind {
        LineKind::Expense => planner.budget.add_expense(&body.name, body.amount).await?,
        LineKind::Extra => planner.budget.add_extra(&body.name, body.amount).await?,
    }
    Ok(Json(planner.budget.view()))
}

async fn remove_line(state: ApiState, kind: LineKind, index: usize) -> ApiResult<impl IntoResponse> {
    let mut planner = state.planner.lock().await;
    match kind {
        LineKind::Expense => planner.budget.remove_expense(index).await?,
        LineKind::Extra => planner.budget.remove_extra(index).await?,
    };
    Ok(Json(planner.budget.view()))
}

async fn add_expense(
    State(state): State<ApiState>,
    Json(body): Json<NewLine>,
) -> ApiResult<impl IntoResponse> {
    add_line(state, LineKind::Expense, body).await
}

async fn add_extra(
    State(state): State<ApiState>,
    Json(body): Json<NewLine>,
) -> ApiResult<impl IntoResponse> {
    add_line(state, LineKind::Extra, body).await
}

async fn remove_expense(
    State(state): State<ApiState>,
    Path(index): Path<usize>,
) -> ApiResult<impl IntoResponse> {
    remove_line(state, LineKind::Expense, index).await
}

async fn remove_extra(
    State(state): State<ApiState>,
    Path(index): Path<usize>,
) -> ApiResult<impl IntoResponse> {
    remove_line(state, LineKind::Extra, index).await
}

async fn navigate(
    State(state): State<ApiState>,
    Path(direction): Path<Direction>,
) -> impl IntoResponse {
    let mut planner = state.planner.lock().await;
    match direction {
        Direction::Prev => planner.budget.prev_month(),
        Direction::Next => planner.budget.next_month(),
    };
    Json(planner.budget.view())
}
