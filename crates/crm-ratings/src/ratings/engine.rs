use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{AgentId, AgentRating, AgentSummary, RankingEntry};
use super::repository::{AgentDirectory, DealLedger, DirectoryError, LedgerError};
use super::scoring::{rate_agent, AgentDealStats, RatingBaseline, RatingConfig};

/// Error raised by the rating engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),
    #[error("a rating recalculation is already in progress")]
    RecalculationInProgress,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Computes bounded 1.0–5.0 performance scores for eligible agents from
/// their won-deal history and writes them back to the directory.
///
/// Recalculations are single-flight: batch and single-agent runs share one
/// latch, so overlapping triggers (periodic tick plus a manual request) fail
/// fast with [`EngineError::RecalculationInProgress`] instead of racing
/// their writes.
pub struct RatingEngine<D, L> {
    directory: Arc<D>,
    ledger: Arc<L>,
    config: RatingConfig,
    recalc_in_flight: AtomicBool,
}

/// Clears the in-flight latch when dropped, so a run that unwinds does not
/// leave the engine permanently busy.
struct InFlightReset<'a>(&'a AtomicBool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<D, L> RatingEngine<D, L>
where
    D: AgentDirectory,
    L: DealLedger,
{
    pub fn new(directory: Arc<D>, ledger: Arc<L>, config: RatingConfig) -> Self {
        Self {
            directory,
            ledger,
            config,
            recalc_in_flight: AtomicBool::new(false),
        }
    }

    /// Recompute and persist the rating of every eligible agent.
    ///
    /// All agents in one invocation are rated against the same baseline,
    /// snapshotted before any write. Per-agent write failures are logged and
    /// skipped; the returned list contains only the ratings that were
    /// actually written, ordered descending by total won value.
    pub fn recalculate_all(&self) -> Result<Vec<AgentRating>, EngineError> {
        let _in_flight = self.acquire_recalc_slot()?;
        self.recalculate_all_inner()
    }

    fn acquire_recalc_slot(&self) -> Result<InFlightReset<'_>, EngineError> {
        if self.recalc_in_flight.swap(true, Ordering::AcqRel) {
            return Err(EngineError::RecalculationInProgress);
        }
        Ok(InFlightReset(&self.recalc_in_flight))
    }

    fn recalculate_all_inner(&self) -> Result<Vec<AgentRating>, EngineError> {
        let mut stats = self.collect_stats()?;
        if stats.is_empty() {
            info!("no eligible agents, skipping rating recalculation");
            return Ok(Vec::new());
        }

        let baseline = RatingBaseline::from_stats(&stats);
        // Stable sort keeps directory order as the tie-break.
        stats.sort_by(|a, b| b.total_won_value.total_cmp(&a.total_won_value));

        let now = Utc::now();
        let mut written = Vec::with_capacity(stats.len());
        for entry in &stats {
            let breakdown = rate_agent(entry, &baseline, &self.config);
            match self
                .directory
                .write_rating(&entry.agent.id, breakdown.rating, now)
            {
                Ok(()) => written.push(AgentRating {
                    agent_id: entry.agent.id.clone(),
                    rating: breakdown.rating,
                    total_won_value: entry.total_won_value,
                    won_deals_count: entry.won_count,
                }),
                Err(err) => warn!(
                    agent_id = %entry.agent.id,
                    error = %err,
                    "failed to persist rating, continuing with remaining agents"
                ),
            }
        }

        info!(agents = written.len(), "rating recalculation complete");
        Ok(written)
    }

    /// Recompute and persist the rating of a single agent.
    ///
    /// Takes the same in-flight latch as the batch, so a concurrent batch
    /// run makes this fail fast with
    /// [`EngineError::RecalculationInProgress`].
    ///
    /// The full eligible population is still read to establish the
    /// comparative baseline, but only the target's stored score changes.
    /// Scores written here can drift from a subsequent full batch if other
    /// agents' deal data moved in the meantime; that staleness is accepted
    /// in exchange for not rewriting the whole population on every closed
    /// deal.
    pub fn recalculate_agent(&self, agent_id: &AgentId) -> Result<f64, EngineError> {
        let _in_flight = self.acquire_recalc_slot()?;
        let stats = self.collect_stats()?;
        let target = stats
            .iter()
            .find(|entry| entry.agent.id == *agent_id)
            .ok_or_else(|| EngineError::AgentNotFound(agent_id.clone()))?;

        let baseline = RatingBaseline::from_stats(&stats);
        let breakdown = rate_agent(target, &baseline, &self.config);
        self.directory
            .write_rating(agent_id, breakdown.rating, Utc::now())?;

        info!(agent_id = %agent_id, rating = breakdown.rating, "agent rating recalculated");
        Ok(breakdown.rating)
    }

    /// Project the last persisted scores into a 1-based leaderboard.
    ///
    /// Pure read: nothing is recomputed or written. Ties keep directory
    /// order.
    pub fn rankings(&self) -> Result<Vec<RankingEntry>, EngineError> {
        let mut agents = self.directory.eligible_agents()?;
        agents.sort_by(|a, b| b.performance_score.total_cmp(&a.performance_score));

        let mut entries = Vec::with_capacity(agents.len());
        for (index, agent) in agents.iter().enumerate() {
            let total_deals = self.ledger.deal_count_for_agent(&agent.id)?;
            let successful_deals = self.ledger.won_deals_by_agent(&agent.id)?.len() as u64;
            entries.push(RankingEntry {
                rank: index as u32 + 1,
                agent: AgentSummary::from(agent),
                rating: agent.performance_score,
                total_deals,
                successful_deals,
            });
        }
        Ok(entries)
    }

    fn collect_stats(&self) -> Result<Vec<AgentDealStats>, EngineError> {
        let agents = self.directory.eligible_agents()?;
        let mut stats = Vec::with_capacity(agents.len());
        for agent in agents {
            let won = self.ledger.won_deals_by_agent(&agent.id)?;
            let total_won_value = won.iter().map(|deal| deal.value).sum();
            stats.push(AgentDealStats {
                agent,
                total_won_value,
                won_count: won.len() as u64,
            });
        }
        Ok(stats)
    }
}
