//! Login event: provisions the profile and pays login XP.

use habitquest_core::RewardsEngine;

pub fn run(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;
    let outcome = engine.on_login(user_id)?;

    println!("{}, {user_id}", engine.greeting());
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
