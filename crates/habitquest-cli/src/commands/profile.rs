//! Profile commands: provisioning, inspection, XP ledger.

use clap::Subcommand;
use habitquest_core::RewardsEngine;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create a profile if it does not exist yet
    Create {
        /// User id
        user_id: String,
    },
    /// Show profile state and level progress
    Show {
        /// User id
        user_id: String,
    },
    /// Recent XP ledger entries, newest first
    XpHistory {
        /// User id
        user_id: String,
        /// Maximum entries to print
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;

    match action {
        ProfileAction::Create { user_id } => {
            let profile = engine.create_profile(&user_id)?;
            println!("Profile ready: {}", profile.user_id);
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Show { user_id } => {
            let profile = engine.profile(&user_id)?;
            let level = engine.level_info(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            println!("{}", serde_json::to_string_pretty(&level)?);
        }
        ProfileAction::XpHistory { user_id, limit } => {
            let rows = engine.xp_history(&user_id, limit)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
