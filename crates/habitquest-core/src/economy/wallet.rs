//! Currency definitions and wallet policy.
//!
//! Three balances with three distinct rule sets:
//! - **Achievement coins**: paid only by achievement and streak-milestone
//!   claims. Uncapped, never reset.
//! - **Engagement coins**: paid by daily quest claims and habit/reflection
//!   logging. Capped at `70 + 5 * level`; the whole balance lazily resets
//!   to 0 when more than 7 days have passed since the last reset, checked
//!   at the moment of the next earn (no background timer).
//! - **Premium coins**: credited only by an external purchase. Uncapped,
//!   never reset.
//!
//! The policy math lives here; the atomic balance mutations themselves are
//! single SQL statements in the storage layer so concurrent callers cannot
//! interleave a stale read-modify-write.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::EconomyConfig;

/// The three wallet currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Earned via achievement and streak-milestone claims
    Achievement,
    /// Earned via daily quests and logging; capped and weekly-reset
    Engagement,
    /// Purchased externally
    Premium,
}

impl Currency {
    pub fn name(&self) -> &'static str {
        match self {
            Currency::Achievement => "achievement",
            Currency::Engagement => "engagement",
            Currency::Premium => "premium",
        }
    }
}

/// Snapshot of one user's balances plus the live engagement cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalances {
    pub achievement_coins: i64,
    pub engagement_coins: i64,
    pub premium_coins: i64,
    /// Current engagement-coin cap (`70 + 5 * level` by default).
    pub engagement_cap: i64,
}

/// Engagement-coin cap for a profile at `level`.
pub fn engagement_cap(level: u32, config: &EconomyConfig) -> i64 {
    config.engagement_cap_base + config.engagement_cap_per_level * level as i64
}

/// Whether the weekly engagement reset is due at `now`.
///
/// Strictly more than `engagement_reset_days` elapsed since the last
/// reset; exactly 7 days is not yet due.
pub fn needs_weekly_reset(
    last_reset: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &EconomyConfig,
) -> bool {
    now - last_reset > Duration::days(config.engagement_reset_days)
}
