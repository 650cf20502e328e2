//! XP ledger types and level-up arithmetic.
//!
//! Granting XP appends an immutable transaction record and advances the
//! profile's counters. The level walk happens here as pure arithmetic;
//! the storage layer runs it inside the same transaction that rewrites
//! the profile row, so concurrent grants cannot lose an update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::xp_for_level;

/// What earned the XP. Tags every ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Habit completion
    Habit,
    /// Journal reflection saved
    Reflection,
    /// Login event
    Login,
    /// Community post
    Community,
    /// Daily quest claim
    Quest,
    /// Streak milestone claim
    Streak,
    /// Achievement claim
    Achievement,
    /// Manual/operator grant
    Admin,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Habit => "habit",
            ActivityType::Reflection => "reflection",
            ActivityType::Login => "login",
            ActivityType::Community => "community",
            ActivityType::Quest => "quest",
            ActivityType::Streak => "streak",
            ActivityType::Achievement => "achievement",
            ActivityType::Admin => "admin",
        }
    }

    /// Parse a ledger tag; unknown tags are a validation error upstream.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "habit" => Some(ActivityType::Habit),
            "reflection" => Some(ActivityType::Reflection),
            "login" => Some(ActivityType::Login),
            "community" => Some(ActivityType::Community),
            "quest" => Some(ActivityType::Quest),
            "streak" => Some(ActivityType::Streak),
            "achievement" => Some(ActivityType::Achievement),
            "admin" => Some(ActivityType::Admin),
            _ => None,
        }
    }
}

/// One immutable XP ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpTransaction {
    pub id: i64,
    pub user_id: String,
    pub amount: i64,
    pub activity_type: ActivityType,
    /// Correlation id, e.g. the achievement or reward id.
    pub activity_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of one grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpGrant {
    pub new_level: u32,
    pub leveled_up: bool,
    pub xp_gained: i64,
}

/// Post-grant profile counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub current_xp: i64,
    pub levels_gained: u32,
}

/// Advance `current_xp` by `amount`, crossing as many level thresholds as
/// the new total covers. No XP is lost: the remainder carries into the new
/// level.
pub fn apply_gain(level: u32, current_xp: i64, amount: i64) -> LevelProgress {
    let mut level = level;
    let mut current_xp = current_xp + amount;
    let mut levels_gained = 0;

    while current_xp >= xp_for_level(level) {
        current_xp -= xp_for_level(level);
        level += 1;
        levels_gained += 1;
    }

    LevelProgress {
        level,
        current_xp,
        levels_gained,
    }
}
