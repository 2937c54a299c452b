use chrono::{DateTime, Utc};
use crm_ratings::ratings::{
    AgentDirectory, AgentId, AgentProfile, Deal, DealLedger, DirectoryError, LedgerError,
    RatingConfig,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) directory: Arc<InMemoryAgentDirectory>,
    pub(crate) ledger: Arc<InMemoryDealLedger>,
}

/// Vec-backed directory; insertion order doubles as the deterministic
/// tie-break the rating engine relies on.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAgentDirectory {
    agents: Arc<Mutex<Vec<AgentProfile>>>,
}

impl InMemoryAgentDirectory {
    pub(crate) fn upsert(&self, agent: AgentProfile) {
        let mut guard = self.agents.lock().expect("directory mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == agent.id) {
            Some(existing) => *existing = agent,
            None => guard.push(agent),
        }
    }

    pub(crate) fn get(&self, id: &AgentId) -> Option<AgentProfile> {
        let guard = self.agents.lock().expect("directory mutex poisoned");
        guard.iter().find(|agent| agent.id == *id).cloned()
    }
}

impl AgentDirectory for InMemoryAgentDirectory {
    fn eligible_agents(&self) -> Result<Vec<AgentProfile>, DirectoryError> {
        let guard = self.agents.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|agent| agent.is_eligible())
            .cloned()
            .collect())
    }

    fn write_rating(
        &self,
        agent_id: &AgentId,
        rating: f64,
        at: DateTime<Utc>,
    ) -> Result<(), DirectoryError> {
        let mut guard = self.agents.lock().expect("directory mutex poisoned");
        let agent = guard
            .iter_mut()
            .find(|agent| agent.id == *agent_id)
            .ok_or(DirectoryError::NotFound)?;
        agent.performance_score = rating;
        agent.last_rank_update = Some(at);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDealLedger {
    deals: Arc<Mutex<Vec<Deal>>>,
}

impl InMemoryDealLedger {
    pub(crate) fn record(&self, deal: Deal) {
        let mut guard = self.deals.lock().expect("ledger mutex poisoned");
        guard.push(deal);
    }
}

impl DealLedger for InMemoryDealLedger {
    fn won_deals_by_agent(&self, agent_id: &AgentId) -> Result<Vec<Deal>, LedgerError> {
        let guard = self.deals.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .filter(|deal| deal.agent_id == *agent_id && deal.stage.is_won())
            .cloned()
            .collect())
    }

    fn deal_count_for_agent(&self, agent_id: &AgentId) -> Result<u64, LedgerError> {
        let guard = self.deals.lock().expect("ledger mutex poisoned");
        Ok(guard.iter().filter(|deal| deal.agent_id == *agent_id).count() as u64)
    }
}

pub(crate) fn default_rating_config() -> RatingConfig {
    RatingConfig {
        elite_value_ratio: 0.9,
        strong_value_ratio: 0.7,
        solid_value_ratio: 0.5,
        developing_value_ratio: 0.3,
        high_volume_threshold: 10,
        steady_volume_threshold: 5,
        high_volume_bonus: 0.5,
        steady_volume_bonus: 0.25,
        premium_quality_multiplier: 1.5,
        elevated_quality_multiplier: 1.2,
        premium_quality_bonus: 0.5,
        elevated_quality_bonus: 0.25,
        rating_ceiling: 5.0,
    }
}
