//! Reward catalog: how much each activity and claim pays.
//!
//! Every number the economy hands out is defined here, so tuning the
//! balance touches one file. Quest and milestone amounts are keyed by the
//! stable reward ids the claim ledger scopes its uniqueness on.

use serde::{Deserialize, Serialize};

/// How demanding a completed habit was; scales the XP side of the grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Light,
    Moderate,
    Intense,
}

impl EffortLevel {
    /// XP granted for completing a habit at this effort.
    pub fn xp_reward(&self) -> i64 {
        match self {
            EffortLevel::Light => 5,
            EffortLevel::Moderate => 10,
            EffortLevel::Intense => 15,
        }
    }
}

impl Default for EffortLevel {
    fn default() -> Self {
        EffortLevel::Moderate
    }
}

/// Engagement coins for logging a habit completion (before the cap).
pub const HABIT_COINS: i64 = 10;

/// XP for saving a journal reflection.
pub const REFLECTION_XP: i64 = 15;
/// Engagement coins for saving a journal reflection (before the cap).
pub const REFLECTION_COINS: i64 = 10;

/// XP for a login event.
pub const LOGIN_XP: i64 = 5;
/// XP for a community post.
pub const COMMUNITY_POST_XP: i64 = 5;

/// XP granted on any achievement claim.
pub const ACHIEVEMENT_CLAIM_XP: i64 = 20;
/// XP granted on any streak-milestone claim.
pub const STREAK_CLAIM_XP: i64 = 30;

/// Stable reward id of the daily login quest.
pub const QUEST_DAILY_LOGIN: &str = "daily_login";
/// Stable reward id of the complete-a-habit daily quest.
pub const QUEST_HABIT_DONE: &str = "habit_done";
/// Stable reward id of the write-a-reflection daily quest.
pub const QUEST_REFLECTION_DONE: &str = "reflection_done";

/// Streak-day thresholds that pay a milestone reward, ascending.
pub const STREAK_MILESTONES: [u32; 4] = [3, 7, 15, 30];

/// Coins + XP paid by one daily quest claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    pub coins: i64,
    pub xp: i64,
}

/// Look up a daily quest by its reward id.
pub fn quest_reward(reward_id: &str) -> Option<QuestReward> {
    match reward_id {
        QUEST_DAILY_LOGIN => Some(QuestReward { coins: 5, xp: 5 }),
        QUEST_HABIT_DONE => Some(QuestReward { coins: 10, xp: 10 }),
        QUEST_REFLECTION_DONE => Some(QuestReward { coins: 10, xp: 10 }),
        _ => None,
    }
}

/// Achievement coins paid for reaching a streak milestone.
pub fn milestone_coins(threshold: u32) -> Option<i64> {
    match threshold {
        3 => Some(15),
        7 => Some(35),
        15 => Some(75),
        30 => Some(150),
        _ => None,
    }
}

/// Reward id for a streak milestone, e.g. `streak_7`.
pub fn milestone_reward_id(threshold: u32) -> String {
    format!("streak_{threshold}")
}

/// Parse a streak-milestone reward id back to its threshold.
///
/// Only known milestones parse; `streak_9` is not a claimable reward.
pub fn parse_milestone_id(reward_id: &str) -> Option<u32> {
    let threshold: u32 = reward_id.strip_prefix("streak_")?.parse().ok()?;
    STREAK_MILESTONES.contains(&threshold).then_some(threshold)
}
