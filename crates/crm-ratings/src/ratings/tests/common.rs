use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::ratings::domain::{AgentId, AgentProfile, AgentRole, Deal, DealId, DealStage};
use crate::ratings::engine::RatingEngine;
use crate::ratings::repository::{
    AgentDirectory, DealLedger, DirectoryError, LedgerError,
};
use crate::ratings::scoring::RatingConfig;

pub(super) fn contributor(id: &str, name: &str) -> AgentProfile {
    AgentProfile {
        id: AgentId(id.to_string()),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        role: AgentRole::Contributor,
        active: true,
        performance_score: 0.0,
        last_rank_update: None,
    }
}

pub(super) fn won_deal(agent: &str, value: f64) -> Deal {
    deal(agent, DealStage::Won, value)
}

pub(super) fn deal(agent: &str, stage: DealStage, value: f64) -> Deal {
    static SEQUENCE: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
    let n = SEQUENCE.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    Deal {
        id: DealId(format!("deal-{n:06}")),
        agent_id: AgentId(agent.to_string()),
        stage,
        value,
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    agents: Mutex<Vec<AgentProfile>>,
}

impl MemoryDirectory {
    pub(super) fn with_agents(agents: Vec<AgentProfile>) -> Self {
        Self {
            agents: Mutex::new(agents),
        }
    }

    pub(super) fn stored(&self, id: &str) -> Option<AgentProfile> {
        let guard = self.agents.lock().expect("directory mutex poisoned");
        guard
            .iter()
            .find(|agent| agent.id.0 == id)
            .cloned()
    }
}

impl AgentDirectory for MemoryDirectory {
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
        match guard.iter_mut().find(|agent| agent.id == *agent_id) {
            Some(agent) => {
                agent.performance_score = rating;
                agent.last_rank_update = Some(at);
                Ok(())
            }
            None => Err(DirectoryError::NotFound),
        }
    }
}

/// Directory whose writes fail for one agent, to exercise the best-effort
/// batch path.
pub(super) struct FlakyDirectory {
    pub(super) inner: MemoryDirectory,
    pub(super) fail_for: AgentId,
}

impl AgentDirectory for FlakyDirectory {
    fn eligible_agents(&self) -> Result<Vec<AgentProfile>, DirectoryError> {
        self.inner.eligible_agents()
    }

    fn write_rating(
        &self,
        agent_id: &AgentId,
        rating: f64,
        at: DateTime<Utc>,
    ) -> Result<(), DirectoryError> {
        if *agent_id == self.fail_for {
            return Err(DirectoryError::Unavailable("write rejected".to_string()));
        }
        self.inner.write_rating(agent_id, rating, at)
    }
}

/// Directory that always fails, for surface-level error mapping tests.
pub(super) struct UnavailableDirectory;

impl AgentDirectory for UnavailableDirectory {
    fn eligible_agents(&self) -> Result<Vec<AgentProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".to_string()))
    }

    fn write_rating(
        &self,
        _agent_id: &AgentId,
        _rating: f64,
        _at: DateTime<Utc>,
    ) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".to_string()))
    }
}

/// Ledger that parks inside the first fetch until released, so a second
/// recalculation can be attempted while one is mid-flight.
pub(super) struct GatedLedger {
    pub(super) entered: Arc<Barrier>,
    pub(super) release: Arc<Barrier>,
    pub(super) gate_used: Mutex<bool>,
}

impl GatedLedger {
    pub(super) fn pair() -> (Arc<Self>, Arc<Barrier>, Arc<Barrier>) {
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let ledger = Arc::new(Self {
            entered: entered.clone(),
            release: release.clone(),
            gate_used: Mutex::new(false),
        });
        (ledger, entered, release)
    }
}

impl DealLedger for GatedLedger {
    fn won_deals_by_agent(&self, _agent_id: &AgentId) -> Result<Vec<Deal>, LedgerError> {
        let mut used = self.gate_used.lock().expect("gate mutex poisoned");
        if !*used {
            *used = true;
            drop(used);
            self.entered.wait();
            self.release.wait();
        }
        Ok(Vec::new())
    }

    fn deal_count_for_agent(&self, _agent_id: &AgentId) -> Result<u64, LedgerError> {
        Ok(0)
    }
}

#[derive(Default)]
pub(super) struct MemoryLedger {
    deals: Mutex<Vec<Deal>>,
}

impl MemoryLedger {
    pub(super) fn with_deals(deals: Vec<Deal>) -> Self {
        Self {
            deals: Mutex::new(deals),
        }
    }

    pub(super) fn record(&self, deal: Deal) {
        let mut guard = self.deals.lock().expect("ledger mutex poisoned");
        guard.push(deal);
    }
}

impl DealLedger for MemoryLedger {
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

pub(super) fn engine_over(
    directory: Arc<MemoryDirectory>,
    ledger: Arc<MemoryLedger>,
) -> RatingEngine<MemoryDirectory, MemoryLedger> {
    RatingEngine::new(directory, ledger, RatingConfig::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
