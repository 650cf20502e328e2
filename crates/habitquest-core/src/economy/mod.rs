//! The virtual economy: reward catalog, currency policies, XP ledger, and
//! the exactly-once claim ledger.

pub mod claims;
pub mod rewards;
pub mod wallet;
pub mod xp;

pub use claims::{ClaimOutcome, ClaimedReward, RewardType};
pub use rewards::{EffortLevel, QuestReward, STREAK_MILESTONES};
pub use wallet::{Currency, WalletBalances};
pub use xp::{ActivityType, XpGrant, XpTransaction};
