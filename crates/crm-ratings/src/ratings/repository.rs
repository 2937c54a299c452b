use chrono::{DateTime, Utc};

use super::domain::{AgentId, AgentProfile, Deal};

/// Read/write boundary to the agent directory. The engine never creates or
/// deletes agents through this trait; `write_rating` is its only mutation.
pub trait AgentDirectory: Send + Sync {
    /// All agents with role `Contributor` and the activity flag set, in
    /// stable store order. The order is the deterministic tie-break for
    /// equal scores.
    fn eligible_agents(&self) -> Result<Vec<AgentProfile>, DirectoryError>;

    /// Persist a freshly computed score and its timestamp onto one agent.
    fn write_rating(
        &self,
        agent_id: &AgentId,
        rating: f64,
        at: DateTime<Utc>,
    ) -> Result<(), DirectoryError>;
}

/// Read-only boundary to the deal ledger.
pub trait DealLedger: Send + Sync {
    /// Deals owned by the agent whose stage is `Won`.
    fn won_deals_by_agent(&self, agent_id: &AgentId) -> Result<Vec<Deal>, LedgerError>;

    /// Count of all deals owned by the agent, any stage. Used only by the
    /// rankings projection.
    fn deal_count_for_agent(&self, agent_id: &AgentId) -> Result<u64, LedgerError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("agent record not found")]
    NotFound,
    #[error("agent directory unavailable: {0}")]
    Unavailable(String),
}

/// Error enumeration for deal ledger failures.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("deal ledger unavailable: {0}")]
    Unavailable(String),
}
