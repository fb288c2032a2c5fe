use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AgentLevel, CommissionInput};
use super::service::CommissionDesk;
use super::views::{TierProgressView, TierView};
use crate::error::AppError;

/// Router builder exposing the commission desk over HTTP.
pub fn commission_router(desk: Arc<CommissionDesk>) -> Router {
    Router::new()
        .route("/api/v1/commissions/calculate", post(calculate_handler))
        .route(
            "/api/v1/commissions/history",
            get(history_handler).delete(clear_history_handler),
        )
        .route("/api/v1/commissions/tiers", get(tiers_handler))
        .route(
            "/api/v1/commissions/tiers/:level/progress",
            get(progress_handler),
        )
        .route("/api/v1/commissions/batch", post(batch_handler))
        .with_state(desk)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressQuery {
    #[serde(default)]
    pub(crate) closed_deals: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    pub(crate) csv: String,
}

pub(crate) async fn calculate_handler(
    State(desk): State<Arc<CommissionDesk>>,
    axum::Json(input): axum::Json<CommissionInput>,
) -> Response {
    let view = desk.calculate(input);
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn history_handler(State(desk): State<Arc<CommissionDesk>>) -> Response {
    (StatusCode::OK, axum::Json(desk.history())).into_response()
}

pub(crate) async fn clear_history_handler(State(desk): State<Arc<CommissionDesk>>) -> Response {
    desk.clear_history();
    StatusCode::NO_CONTENT.into_response()
}

pub(crate) async fn tiers_handler(State(desk): State<Arc<CommissionDesk>>) -> Response {
    (StatusCode::OK, axum::Json(TierView::all(desk.tiers()))).into_response()
}

pub(crate) async fn progress_handler(
    State(desk): State<Arc<CommissionDesk>>,
    Path(level): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> Response {
    let level = match level.parse::<AgentLevel>() {
        Ok(level) => level,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    let view = TierProgressView::from(desk.progress(level, query.closed_deals));
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn batch_handler(
    State(desk): State<Arc<CommissionDesk>>,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Result<axum::Json<serde_json::Value>, AppError> {
    let report = desk.batch(Cursor::new(request.csv.into_bytes()))?;
    Ok(axum::Json(json!({
        "entries": report.entries,
        "summary": report.summary(),
    })))
}
