//! Community post event.

use habitquest_core::RewardsEngine;

pub fn run(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;
    let outcome = engine.on_community_post(user_id)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
