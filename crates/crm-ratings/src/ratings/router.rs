use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{AgentId, AgentRating};
use super::engine::{EngineError, RatingEngine};
use super::repository::{AgentDirectory, DealLedger};

/// Router builder exposing the engine's three operations over HTTP.
pub fn rating_router<D, L>(engine: Arc<RatingEngine<D, L>>) -> Router
where
    D: AgentDirectory + 'static,
    L: DealLedger + 'static,
{
    Router::new()
        .route(
            "/api/v1/ratings/recalculate",
            post(recalculate_all_handler::<D, L>),
        )
        .route(
            "/api/v1/agents/:agent_id/rating/recalculate",
            post(recalculate_agent_handler::<D, L>),
        )
        .route("/api/v1/rankings", get(rankings_handler::<D, L>))
        .with_state(engine)
}

#[derive(Debug, Serialize)]
struct RecalculationResponse {
    recalculated: usize,
    ratings: Vec<AgentRating>,
}

pub(crate) async fn recalculate_all_handler<D, L>(
    State(engine): State<Arc<RatingEngine<D, L>>>,
) -> Response
where
    D: AgentDirectory + 'static,
    L: DealLedger + 'static,
{
    match engine.recalculate_all() {
        Ok(ratings) => {
            let body = RecalculationResponse {
                recalculated: ratings.len(),
                ratings,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(EngineError::RecalculationInProgress) => {
            let payload = json!({
                "error": "a rating recalculation is already in progress",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn recalculate_agent_handler<D, L>(
    State(engine): State<Arc<RatingEngine<D, L>>>,
    Path(agent_id): Path<String>,
) -> Response
where
    D: AgentDirectory + 'static,
    L: DealLedger + 'static,
{
    let id = AgentId(agent_id);
    match engine.recalculate_agent(&id) {
        Ok(rating) => {
            let payload = json!({
                "agent_id": id.0,
                "rating": rating,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(EngineError::AgentNotFound(_)) => {
            let payload = json!({
                "error": format!("agent not found: {}", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(EngineError::RecalculationInProgress) => {
            let payload = json!({
                "error": "a rating recalculation is already in progress",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn rankings_handler<D, L>(State(engine): State<Arc<RatingEngine<D, L>>>) -> Response
where
    D: AgentDirectory + 'static,
    L: DealLedger + 'static,
{
    match engine.rankings() {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
