use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use tower::ServiceExt;

use super::common::*;
use crate::ratings::engine::RatingEngine;
use crate::ratings::router::{rating_router, recalculate_agent_handler};
use crate::ratings::scoring::RatingConfig;

fn scenario_router() -> (
    axum::Router,
    Arc<RatingEngine<MemoryDirectory, MemoryLedger>>,
) {
    let directory = Arc::new(MemoryDirectory::with_agents(vec![
        contributor("a1", "Avery Chen"),
        contributor("a2", "Blake Ortiz"),
    ]));
    let ledger = Arc::new(MemoryLedger::with_deals(vec![
        won_deal("a1", 1000.0),
        won_deal("a2", 500.0),
    ]));
    let engine = Arc::new(engine_over(directory, ledger));
    (rating_router(engine.clone()), engine)
}

#[tokio::test]
async fn recalculate_route_returns_written_ratings() {
    let (router, _) = scenario_router();

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/ratings/recalculate")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["recalculated"], 2);
    let ratings = payload["ratings"].as_array().expect("ratings array");
    assert_eq!(ratings[0]["agent_id"], "a1");
    assert_eq!(ratings[0]["rating"], 5.0);
    assert_eq!(ratings[1]["agent_id"], "a2");
    assert_eq!(ratings[1]["rating"], 3.0);
}

#[tokio::test]
async fn agent_recalculate_route_reports_single_rating() {
    let (router, _) = scenario_router();

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/agents/a2/rating/recalculate")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["agent_id"], "a2");
    assert_eq!(payload["rating"], 3.0);
}

#[tokio::test]
async fn agent_recalculate_handler_returns_not_found_for_unknown_id() {
    let (_, engine) = scenario_router();

    let response = recalculate_agent_handler::<MemoryDirectory, MemoryLedger>(
        State(engine),
        axum::extract::Path("ghost".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error string")
        .contains("ghost"));
}

#[tokio::test]
async fn agent_recalculate_handler_reports_conflict_while_a_batch_runs() {
    let (ledger, entered, release) = GatedLedger::pair();
    let directory = Arc::new(MemoryDirectory::with_agents(vec![contributor(
        "a1",
        "Avery Chen",
    )]));
    let engine = Arc::new(RatingEngine::new(
        directory,
        ledger,
        RatingConfig::default(),
    ));

    let background = {
        let engine = engine.clone();
        std::thread::spawn(move || engine.recalculate_all())
    };
    entered.wait();

    let response = recalculate_agent_handler::<MemoryDirectory, GatedLedger>(
        State(engine),
        axum::extract::Path("a1".to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    release.wait();
    background
        .join()
        .expect("background thread completes")
        .expect("batch succeeds");
}

#[tokio::test]
async fn rankings_route_returns_ordered_leaderboard() {
    let (router, engine) = scenario_router();
    engine.recalculate_all().expect("seed stored scores");

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/rankings")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("rankings array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["agent"]["id"], "a1");
    assert_eq!(entries[0]["agent"]["email"], "a1@example.com");
    assert_eq!(entries[1]["rank"], 2);
    assert_eq!(entries[1]["agent"]["id"], "a2");
}

#[tokio::test]
async fn recalculate_route_maps_store_failures_to_internal_error() {
    let engine = Arc::new(RatingEngine::new(
        Arc::new(UnavailableDirectory),
        Arc::new(MemoryLedger::default()),
        RatingConfig::default(),
    ));
    let router = rating_router(engine);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/ratings/recalculate")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
