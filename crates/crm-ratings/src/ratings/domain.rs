use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for agents in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for deal records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

/// Directory role; only contributors participate in the rating population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Admin,
    Contributor,
}

/// Agent record as stored in the directory. The engine only ever mutates
/// `performance_score` and `last_rank_update`; onboarding and offboarding
/// happen elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    pub name: String,
    pub email: String,
    pub role: AgentRole,
    pub active: bool,
    pub performance_score: f64,
    pub last_rank_update: Option<DateTime<Utc>>,
}

impl AgentProfile {
    /// Eligible agents are active contributors; everyone else is outside the
    /// statistics population and the output ranking.
    pub fn is_eligible(&self) -> bool {
        self.active && self.role == AgentRole::Contributor
    }
}

/// Pipeline stage of a deal. Only `Won` contributes to ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Prospecting,
    Negotiation,
    Won,
    Lost,
}

impl DealStage {
    pub fn is_won(self) -> bool {
        self == DealStage::Won
    }
}

/// Immutable deal record owned by a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub agent_id: AgentId,
    pub stage: DealStage,
    pub value: f64,
}

/// One row of the batch recalculation output: what was written for an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRating {
    pub agent_id: AgentId,
    pub rating: f64,
    pub total_won_value: f64,
    pub won_deals_count: u64,
}

/// Contact projection exposed by the rankings view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub name: String,
    pub email: String,
}

impl From<&AgentProfile> for AgentSummary {
    fn from(profile: &AgentProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
        }
    }
}

/// One row of the rankings projection, rank starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub agent: AgentSummary,
    pub rating: f64,
    pub total_deals: u64,
    pub successful_deals: u64,
}
