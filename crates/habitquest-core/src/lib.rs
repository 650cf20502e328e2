//! # HabitQuest Core Library
//!
//! This library provides the gamification rules engine for the HabitQuest
//! habit tracker. It implements a CLI-first philosophy where all operations
//! are available via a standalone CLI binary, with any GUI layer being a
//! thin shell over the same core library.
//!
//! ## Architecture
//!
//! - **Engine**: Synchronous facade turning activity events (habit
//!   completions, reflections, logins, community posts) into XP grants,
//!   currency credits, and claimable rewards
//! - **Economy**: Reward catalog, three-currency wallet rules, XP level
//!   walk, and the exactly-once claim ledger
//! - **Storage**: SQLite-based profile/ledger persistence and TOML-based
//!   configuration
//! - **Notifications**: Pure, stateless composer deriving the ordered
//!   notification list from current state
//!
//! ## Key Components
//!
//! - [`RewardsEngine`]: Core rules engine facade
//! - [`Database`]: Profile, ledger, and claim persistence
//! - [`EngineConfig`]: Application configuration management
//! - [`Clock`]: Fixed-offset calendar clock for all day-boundary logic

pub mod achievements;
pub mod clock;
pub mod economy;
pub mod engine;
pub mod error;
pub mod level;
pub mod notifications;
pub mod storage;
pub mod streak;

pub use achievements::{Achievement, AchievementStatus, RequirementKind, UserStats};
pub use clock::{Clock, DayPart, APP_UTC_OFFSET_MINUTES};
pub use economy::claims::{ClaimOutcome, ClaimedReward, RewardType};
pub use economy::rewards::{EffortLevel, QuestReward};
pub use economy::wallet::{Currency, WalletBalances};
pub use economy::xp::{ActivityType, XpGrant, XpTransaction};
pub use engine::{ActivityOutcome, RewardsEngine, StreakSummary};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use level::LevelInfo;
pub use notifications::{Notification, NotificationKind, Reminder};
pub use storage::{Database, EngineConfig, Profile};
