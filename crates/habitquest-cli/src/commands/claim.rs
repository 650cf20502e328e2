//! Claim a quest, streak-milestone, or achievement reward.

use habitquest_core::{RewardType, RewardsEngine};

pub fn run(
    user_id: &str,
    reward_type: &str,
    reward_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let reward_type = RewardType::parse(reward_type).ok_or(format!(
        "unknown reward type: {reward_type} (expected quest, streak, or achievement)"
    ))?;

    let engine = RewardsEngine::new()?;
    let outcome = engine.claim(user_id, reward_type, reward_id)?;

    println!(
        "Claimed {}: +{} {} coins",
        outcome.reward_id,
        outcome.coins,
        outcome.currency.name()
    );
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
