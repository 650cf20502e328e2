//! Claim ledger types.
//!
//! A claim converts a qualified reward into coins and XP exactly once per
//! scope: per calendar day for quests and streak milestones, permanently
//! for achievements. The exactly-once guarantee is the storage layer's
//! uniqueness constraint -- there is deliberately no client-side "already
//! claimed?" pre-check, because two racing claims must resolve at the
//! store, not at a stale read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::rewards::{self, QuestReward};
use super::wallet::Currency;
use super::xp::XpGrant;
use crate::error::ValidationError;

/// Scope class of a claimable reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    /// Daily quest -- claimable once per calendar day
    Quest,
    /// Streak milestone -- claimable once per calendar day
    Streak,
    /// Achievement -- claimable once, ever
    Achievement,
}

impl RewardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::Quest => "quest",
            RewardType::Streak => "streak",
            RewardType::Achievement => "achievement",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "quest" => Some(RewardType::Quest),
            "streak" => Some(RewardType::Streak),
            "achievement" => Some(RewardType::Achievement),
            _ => None,
        }
    }

    /// Day-scoped rewards become claimable again the next calendar day.
    pub fn is_day_scoped(&self) -> bool {
        matches!(self, RewardType::Quest | RewardType::Streak)
    }
}

/// One day-scoped claim record (quests and streak milestones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimedReward {
    pub user_id: String,
    pub reward_id: String,
    pub reward_type: RewardType,
    pub claim_date: NaiveDate,
    pub coins_claimed: i64,
    pub claimed_at: DateTime<Utc>,
}

/// What a successful claim paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub reward_id: String,
    pub reward_type: RewardType,
    pub currency: Currency,
    pub coins: i64,
    /// XP side of the claim; `None` if the grant step failed after the
    /// coins were already credited (logged, not rolled back).
    pub xp: Option<XpGrant>,
    /// The day the claim is scoped to; `None` for permanent claims.
    pub claim_date: Option<NaiveDate>,
}

/// Resolve a quest reward id to its payout.
pub fn resolve_quest(reward_id: &str) -> Result<QuestReward, ValidationError> {
    rewards::quest_reward(reward_id)
        .ok_or_else(|| ValidationError::UnknownReward(reward_id.to_string()))
}

/// Resolve a streak-milestone reward id to `(threshold, coins)`.
pub fn resolve_streak(reward_id: &str) -> Result<(u32, i64), ValidationError> {
    let threshold = rewards::parse_milestone_id(reward_id)
        .ok_or_else(|| ValidationError::UnknownReward(reward_id.to_string()))?;
    let coins = rewards::milestone_coins(threshold)
        .ok_or_else(|| ValidationError::UnknownReward(reward_id.to_string()))?;
    Ok((threshold, coins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_type_tags_round_trip() {
        for ty in [RewardType::Quest, RewardType::Streak, RewardType::Achievement] {
            assert_eq!(RewardType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(RewardType::parse("bounty"), None);
    }

    #[test]
    fn day_scoping() {
        assert!(RewardType::Quest.is_day_scoped());
        assert!(RewardType::Streak.is_day_scoped());
        assert!(!RewardType::Achievement.is_day_scoped());
    }

    #[test]
    fn quest_resolution() {
        assert!(resolve_quest("daily_login").is_ok());
        assert!(matches!(
            resolve_quest("daily_stretch"),
            Err(ValidationError::UnknownReward(_))
        ));
    }

    #[test]
    fn streak_resolution() {
        assert_eq!(resolve_streak("streak_7").unwrap(), (7, 35));
        assert!(resolve_streak("streak_8").is_err());
        assert!(resolve_streak("weekly").is_err());
    }
}
