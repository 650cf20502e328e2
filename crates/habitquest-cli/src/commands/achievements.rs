//! Achievement catalog and progress commands.

use clap::Subcommand;
use habitquest_core::RewardsEngine;

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// List achievements with qualification and earned state
    List {
        /// User id
        user_id: String,
    },
}

pub fn run(action: AchievementsAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;

    match action {
        AchievementsAction::List { user_id } => {
            let statuses = engine.achievements_status(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
    }
    Ok(())
}
