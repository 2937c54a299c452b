use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use crm_ratings::ratings::{
    rating_router, AgentDirectory, AgentId, AgentProfile, AgentRole, Deal, DealId, DealLedger,
    DealStage, RatingEngine,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Register/record payloads feed the in-memory collaborator stores; the CRM
/// proper owns agent and deal lifecycles in production.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterAgentRequest {
    pub(crate) id: Option<String>,
    pub(crate) name: String,
    pub(crate) email: String,
    #[serde(default = "default_role")]
    pub(crate) role: AgentRole,
    #[serde(default = "default_active")]
    pub(crate) active: bool,
}

fn default_role() -> AgentRole {
    AgentRole::Contributor
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordDealRequest {
    pub(crate) id: Option<String>,
    pub(crate) agent_id: String,
    pub(crate) stage: DealStage,
    pub(crate) value: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AgentView {
    pub(crate) agent_id: String,
    pub(crate) name: String,
    pub(crate) active: bool,
}

static AGENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DEAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_agent_id() -> AgentId {
    let n = AGENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AgentId(format!("agent-{n:06}"))
}

fn next_deal_id() -> DealId {
    let n = DEAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DealId(format!("deal-{n:06}"))
}

pub(crate) fn with_rating_routes<D, L>(engine: Arc<RatingEngine<D, L>>) -> axum::Router
where
    D: AgentDirectory + 'static,
    L: DealLedger + 'static,
{
    rating_router(engine)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/agents", axum::routing::post(register_agent_endpoint))
        .route("/api/v1/deals", axum::routing::post(record_deal_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn register_agent_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterAgentRequest>,
) -> Response {
    let RegisterAgentRequest {
        id,
        name,
        email,
        role,
        active,
    } = payload;

    if name.trim().is_empty() || email.trim().is_empty() {
        let body = json!({ "error": "name and email are required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }

    let agent_id = id.map(AgentId).unwrap_or_else(next_agent_id);
    // Re-registration keeps any rating already earned.
    let (performance_score, last_rank_update) = state
        .directory
        .get(&agent_id)
        .map(|existing| (existing.performance_score, existing.last_rank_update))
        .unwrap_or((0.0, None));

    let profile = AgentProfile {
        id: agent_id.clone(),
        name: name.clone(),
        email,
        role,
        active,
        performance_score,
        last_rank_update,
    };
    state.directory.upsert(profile);

    let view = AgentView {
        agent_id: agent_id.0,
        name,
        active,
    };
    (StatusCode::CREATED, Json(view)).into_response()
}

pub(crate) async fn record_deal_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RecordDealRequest>,
) -> Response {
    let RecordDealRequest {
        id,
        agent_id,
        stage,
        value,
    } = payload;

    if !value.is_finite() || value < 0.0 {
        let body = json!({ "error": "deal value must be a non-negative number" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }

    let agent_id = AgentId(agent_id);
    if state.directory.get(&agent_id).is_none() {
        let body = json!({ "error": format!("agent not found: {}", agent_id.0) });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }

    let deal = Deal {
        id: id.map(DealId).unwrap_or_else(next_deal_id),
        agent_id,
        stage,
        value,
    };
    state.ledger.record(deal.clone());

    let body = json!({ "deal_id": deal.id.0, "stage": deal.stage });
    (StatusCode::CREATED, Json(body)).into_response()
}
