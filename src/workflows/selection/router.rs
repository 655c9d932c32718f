use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::CandidateId;
use super::final_order::MoveDirection;
use super::service::{SelectionService, SelectionServiceError};
use super::store::StateStore;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    question: u8,
    score: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveRequest {
    index: usize,
    direction: MoveDirection,
}

/// Router builder exposing the interview, ranking, and final-order endpoints.
pub fn selection_router<S>(service: Arc<SelectionService<S>>) -> Router
where
    S: StateStore + 'static,
{
    Router::new()
        .route("/api/v1/selection/rankings", get(rankings_handler::<S>))
        .route("/api/v1/selection/plan", post(plan_handler::<S>))
        .route("/api/v1/selection/final-order", get(final_order_handler::<S>))
        .route("/api/v1/selection/final-order/move", post(move_handler::<S>))
        .route(
            "/api/v1/selection/candidates/:candidate_id/scores",
            post(score_handler::<S>),
        )
        .route(
            "/api/v1/selection/candidates/:candidate_id/complete",
            post(complete_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn rankings_handler<S>(
    State(service): State<Arc<SelectionService<S>>>,
) -> Response
where
    S: StateStore + 'static,
{
    match service.rankings() {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn plan_handler<S>(
    State(service): State<Arc<SelectionService<S>>>,
) -> Response
where
    S: StateStore + 'static,
{
    match service.generate_final_order() {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn final_order_handler<S>(
    State(service): State<Arc<SelectionService<S>>>,
) -> Response
where
    S: StateStore + 'static,
{
    match service.final_order() {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn move_handler<S>(
    State(service): State<Arc<SelectionService<S>>>,
    Json(request): Json<MoveRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    match service.move_entry(request.index, request.direction) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<SelectionService<S>>>,
    Path(candidate_id): Path<String>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = CandidateId(candidate_id);
    match service.record_score(&id, request.question, request.score) {
        Ok(candidate) => (StatusCode::OK, Json(candidate)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_handler<S>(
    State(service): State<Arc<SelectionService<S>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = CandidateId(candidate_id);
    match service.complete_interview(&id) {
        Ok(candidate) => (StatusCode::OK, Json(candidate)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: SelectionServiceError) -> Response {
    match err {
        SelectionServiceError::Plan(plan) => {
            let payload = json!({
                "error": plan.to_string(),
                "detail": plan,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        SelectionServiceError::UnknownCandidate(_) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        SelectionServiceError::Store(_) => {
            error!(error = %err, "selection state store failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        SelectionServiceError::UnknownQuestion(_)
        | SelectionServiceError::ScoreOutOfRange { .. }
        | SelectionServiceError::InterviewIncomplete { .. }
        | SelectionServiceError::InvalidMove { .. } => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}
