//! Streak inspection.

use habitquest_core::RewardsEngine;

pub fn run(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;
    let streaks = engine.get_streak(user_id)?;
    println!("{}", serde_json::to_string_pretty(&streaks)?);
    Ok(())
}
