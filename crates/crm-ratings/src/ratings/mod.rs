//! Agent performance rating engine and its surrounding plumbing.
//!
//! The engine reads agents and their won deals through the [`repository`]
//! traits, derives a 1.0–5.0 score per agent from the [`scoring`] rules, and
//! writes the score back onto the agent record. [`scheduler`] owns the
//! periodic batch recalculation; [`router`] exposes the three operations over
//! HTTP.

pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod scheduler;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use domain::{
    AgentId, AgentProfile, AgentRating, AgentRole, AgentSummary, Deal, DealId, DealStage,
    RankingEntry,
};
pub use engine::{EngineError, RatingEngine};
pub use repository::{AgentDirectory, DealLedger, DirectoryError, LedgerError};
pub use router::rating_router;
pub use scheduler::{RatingJob, RatingJobConfig};
pub use scoring::{rate_agent, AgentDealStats, RatingBaseline, RatingBreakdown, RatingConfig};
