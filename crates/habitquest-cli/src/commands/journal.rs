//! Journal reflection commands.

use clap::Subcommand;
use habitquest_core::RewardsEngine;

#[derive(Subcommand)]
pub enum JournalAction {
    /// Save today's reflection
    Log {
        /// User id
        user_id: String,
    },
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;

    match action {
        JournalAction::Log { user_id } => {
            let outcome = engine.on_reflection_saved(&user_id)?;
            if outcome.applied {
                println!("Reflection saved");
            } else {
                println!("Already reflected today");
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
