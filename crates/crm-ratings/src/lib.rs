//! Core library for the CRM agent performance rating service.
//!
//! The engine converts each sales agent's closed-deal history into a bounded
//! 1.0–5.0 quality score and a global ranking. Storage is abstracted behind
//! the [`ratings::repository`] traits so the engine can run against any agent
//! directory and deal ledger implementation.

pub mod config;
pub mod error;
pub mod ratings;
pub mod telemetry;
