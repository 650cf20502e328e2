//! Notification feed commands.

use clap::Subcommand;
use habitquest_core::RewardsEngine;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List the current notification feed
    List {
        /// User id
        user_id: String,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;

    match action {
        NotifyAction::List { user_id } => {
            let feed = engine.get_notifications(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&feed)?);
        }
    }
    Ok(())
}
