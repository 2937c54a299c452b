use crate::infra::{default_rating_config, InMemoryAgentDirectory, InMemoryDealLedger};
use clap::Args;
use crm_ratings::error::AppError;
use crm_ratings::ratings::{
    AgentId, AgentProfile, AgentRole, Deal, DealId, DealStage, RatingEngine,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Limit the printed leaderboard to the top N agents
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

/// Seeds a small sales roster, runs one batch recalculation, and prints the
/// resulting leaderboard. Useful for stakeholder walkthroughs without a
/// running CRM.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let directory = Arc::new(InMemoryAgentDirectory::default());
    let ledger = Arc::new(InMemoryDealLedger::default());

    seed_roster(&directory);
    seed_deals(&ledger);

    let engine = RatingEngine::new(directory, ledger, default_rating_config());
    let written = engine.recalculate_all().map_err(AppError::Rating)?;

    println!("Batch recalculation rated {} agents\n", written.len());
    println!(
        "{:<6} {:<18} {:>7} {:>12} {:>6}",
        "Rank", "Agent", "Rating", "Won value", "Wins"
    );
    for entry in engine.rankings().map_err(AppError::Rating)? {
        if let Some(top) = args.top {
            if entry.rank as usize > top {
                break;
            }
        }
        println!(
            "{:<6} {:<18} {:>7.1} {:>12.2} {:>6}",
            entry.rank,
            entry.agent.name,
            entry.rating,
            written
                .iter()
                .find(|rating| rating.agent_id == entry.agent.id)
                .map(|rating| rating.total_won_value)
                .unwrap_or(0.0),
            entry.successful_deals,
        );
    }

    Ok(())
}

fn seed_roster(directory: &InMemoryAgentDirectory) {
    let roster = [
        ("ines", "Ines Duarte", AgentRole::Contributor, true),
        ("malik", "Malik Webb", AgentRole::Contributor, true),
        ("tova", "Tova Lindqvist", AgentRole::Contributor, true),
        ("priya", "Priya Raman", AgentRole::Contributor, true),
        ("root", "Root Admin", AgentRole::Admin, true),
        ("alum", "Former Agent", AgentRole::Contributor, false),
    ];
    for (id, name, role, active) in roster {
        directory.upsert(AgentProfile {
            id: AgentId(id.to_string()),
            name: name.to_string(),
            email: format!("{id}@crm.example"),
            role,
            active,
            performance_score: 0.0,
            last_rank_update: None,
        });
    }
}

fn seed_deals(ledger: &InMemoryDealLedger) {
    let history: [(&str, DealStage, f64); 16] = [
        ("ines", DealStage::Won, 24_000.0),
        ("ines", DealStage::Won, 18_500.0),
        ("ines", DealStage::Won, 9_750.0),
        ("ines", DealStage::Won, 31_000.0),
        ("ines", DealStage::Won, 12_250.0),
        ("ines", DealStage::Lost, 40_000.0),
        ("malik", DealStage::Won, 8_000.0),
        ("malik", DealStage::Won, 6_500.0),
        ("malik", DealStage::Won, 7_250.0),
        ("malik", DealStage::Negotiation, 22_000.0),
        ("tova", DealStage::Won, 52_000.0),
        ("tova", DealStage::Lost, 11_000.0),
        ("priya", DealStage::Won, 3_200.0),
        ("priya", DealStage::Prospecting, 9_000.0),
        ("alum", DealStage::Won, 90_000.0),
        ("root", DealStage::Won, 1_000.0),
    ];
    for (index, (agent, stage, value)) in history.into_iter().enumerate() {
        ledger.record(Deal {
            id: DealId(format!("demo-{index:03}")),
            agent_id: AgentId(agent.to_string()),
            stage,
            value,
        });
    }
}
