use crate::cli::ServeArgs;
use crate::infra::{default_rating_config, AppState, InMemoryAgentDirectory, InMemoryDealLedger};
use crate::routes::with_rating_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use crm_ratings::config::AppConfig;
use crm_ratings::error::AppError;
use crm_ratings::ratings::{RatingEngine, RatingJob};
use crm_ratings::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let directory = Arc::new(InMemoryAgentDirectory::default());
    let ledger = Arc::new(InMemoryDealLedger::default());
    let engine = Arc::new(RatingEngine::new(
        directory.clone(),
        ledger.clone(),
        default_rating_config(),
    ));

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        directory,
        ledger,
    };

    let rating_job = RatingJob::new(engine.clone(), config.ratings.job_config());
    let job_shutdown = rating_job.start();

    let app = with_rating_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "crm rating service ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the periodic recalculation alongside the server.
    let _ = job_shutdown.send(true);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
