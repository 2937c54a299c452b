use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::engine::{EngineError, RatingEngine};
use super::repository::{AgentDirectory, DealLedger};

/// Cadence configuration for the periodic batch recalculation.
#[derive(Debug, Clone)]
pub struct RatingJobConfig {
    /// Interval between runs (default: 6 hours).
    pub interval: Duration,
    /// Wall-clock budget for one run.
    pub run_timeout: Duration,
    /// Whether the job is started at all.
    pub enabled: bool,
}

impl Default for RatingJobConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(6 * 60 * 60),
            run_timeout: Duration::from_secs(300),
            enabled: true,
        }
    }
}

/// Background runner that recalculates all ratings once at startup and on a
/// fixed interval afterwards.
///
/// The task is owned by the process lifecycle: `start` returns a shutdown
/// sender and the loop exits when `true` is sent through it.
pub struct RatingJob<D, L> {
    engine: Arc<RatingEngine<D, L>>,
    config: RatingJobConfig,
}

impl<D, L> RatingJob<D, L>
where
    D: AgentDirectory + 'static,
    L: DealLedger + 'static,
{
    pub fn new(engine: Arc<RatingEngine<D, L>>, config: RatingJobConfig) -> Self {
        Self { engine, config }
    }

    /// Spawn the job, returning its shutdown handle.
    pub fn start(self) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        if !self.config.enabled {
            info!("rating recalculation job is disabled");
            return shutdown_tx;
        }

        let RatingJob { engine, config } = self;

        tokio::spawn(async move {
            info!(interval = ?config.interval, "starting rating recalculation job");

            // The first tick completes immediately, giving the run-at-boot
            // pass before the interval cadence takes over.
            let mut ticker = tokio::time::interval(config.interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_once(engine.clone(), config.run_timeout).await;
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("rating recalculation job shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

/// Execute one batch recalculation with a wall-clock bound. Every failure
/// mode is logged and swallowed so a bad tick never takes down the host
/// process.
async fn run_once<D, L>(engine: Arc<RatingEngine<D, L>>, run_timeout: Duration)
where
    D: AgentDirectory + 'static,
    L: DealLedger + 'static,
{
    let run = tokio::task::spawn_blocking(move || engine.recalculate_all());

    match tokio::time::timeout(run_timeout, run).await {
        Ok(Ok(Ok(written))) => {
            info!(agents = written.len(), "scheduled rating recalculation complete");
        }
        Ok(Ok(Err(EngineError::RecalculationInProgress))) => {
            info!("a recalculation is already running, skipping this tick");
        }
        Ok(Ok(Err(err))) => {
            error!(error = %err, "scheduled rating recalculation failed");
        }
        Ok(Err(err)) => {
            error!(error = %err, "rating recalculation task aborted");
        }
        Err(_) => {
            // The blocking task keeps running past the deadline; the engine's
            // single-flight guard prevents the next tick from overlapping it.
            warn!(timeout = ?run_timeout, "rating recalculation exceeded its time budget");
        }
    }
}
