//! Statistics commands for CLI.

use clap::Subcommand;
use taskdeck_core::{JsonStore, TaskManager};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Full statistics with insights (runs the auto-advance sweep)
    Show {
        /// Owner id (default: configured owner)
        #[arg(long)]
        owner: Option<String>,
    },
    /// Quick status counts, no sweep
    Overview {
        /// Owner id (default: configured owner)
        #[arg(long)]
        owner: Option<String>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let manager = TaskManager::new(JsonStore::open_default()?);

    match action {
        StatsAction::Show { owner } => {
            let stats = manager.statistics(&super::resolve_owner(owner))?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Overview { owner } => {
            let overview = manager.status_overview(&super::resolve_owner(owner))?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
    }
    Ok(())
}
