mod config;
mod rules;

pub use config::RatingConfig;

use serde::{Deserialize, Serialize};

use super::domain::AgentProfile;

/// Per-agent won-deal statistics snapshotted at the start of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDealStats {
    pub agent: AgentProfile,
    pub total_won_value: f64,
    pub won_count: u64,
}

impl AgentDealStats {
    /// Mean value of the agent's own won deals; 0 with no wins.
    pub fn avg_deal_value(&self) -> f64 {
        if self.won_count == 0 {
            0.0
        } else {
            self.total_won_value / self.won_count as f64
        }
    }
}

/// Comparative baseline shared by every agent in one recalculation. Computed
/// once per run so per-agent writes cannot shift other agents' ratios within
/// the same batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBaseline {
    /// Largest total won value across the eligible population.
    pub max_value: f64,
    /// Mean total won value per agent (over agent count, not deal count).
    pub avg_value: f64,
}

impl RatingBaseline {
    pub fn from_stats(stats: &[AgentDealStats]) -> Self {
        let max_value = stats
            .iter()
            .map(|entry| entry.total_won_value)
            .fold(0.0_f64, f64::max);
        let avg_value = if stats.is_empty() {
            0.0
        } else {
            stats.iter().map(|entry| entry.total_won_value).sum::<f64>() / stats.len() as f64
        };
        Self {
            max_value,
            avg_value,
        }
    }
}

/// Discrete contributions to a rating, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBreakdown {
    pub value_ratio: f64,
    pub base: f64,
    pub volume_bonus: f64,
    pub quality_bonus: f64,
    /// Final score: base + bonuses, capped, rounded to one decimal place.
    pub rating: f64,
}

/// Rate one agent against the population baseline. Pure: the same inputs
/// always produce the same breakdown.
pub fn rate_agent(
    stats: &AgentDealStats,
    baseline: &RatingBaseline,
    config: &RatingConfig,
) -> RatingBreakdown {
    let value_ratio = rules::value_ratio(stats.total_won_value, baseline.max_value);
    let base = rules::base_rating(value_ratio, config);
    let volume_bonus = rules::volume_bonus(stats.won_count, config);
    let quality_bonus = rules::quality_bonus(stats.avg_deal_value(), baseline.avg_value, config);

    let capped = (base + volume_bonus + quality_bonus).min(config.rating_ceiling);
    let rating = rules::round_to_tenth(capped);

    RatingBreakdown {
        value_ratio,
        base,
        volume_bonus,
        quality_bonus,
        rating,
    }
}
