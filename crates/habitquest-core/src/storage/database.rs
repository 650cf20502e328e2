//! SQLite-based storage for profiles, the XP ledger, wallets, claims, and
//! activity history.
//!
//! All profile mutations run inside an immediate transaction so the
//! read-compute-write sequences (level walk, cap clamp, balance check)
//! are atomic per user. Claim uniqueness is enforced by UNIQUE indexes,
//! not by pre-checks: a duplicate insert fails at the store even when two
//! callers race past the same stale read.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use super::migrations;
use super::{data_dir, EconomyConfig};
use crate::achievements::{Achievement, RequirementKind};
use crate::economy::claims::{ClaimedReward, RewardType};
use crate::economy::rewards::EffortLevel;
use crate::economy::wallet::{engagement_cap, needs_weekly_reset, Currency};
use crate::economy::xp::{apply_gain, ActivityType, XpGrant, XpTransaction};
use crate::error::{CoreError, DatabaseError, Result};
use crate::notifications::Reminder;

// === Helper Functions ===

/// Parse activity type from database string
fn parse_activity_type(tag: &str) -> ActivityType {
    ActivityType::parse(tag).unwrap_or(ActivityType::Admin)
}

/// Parse reward type from database string
fn parse_reward_type(tag: &str) -> RewardType {
    RewardType::parse(tag).unwrap_or(RewardType::Quest)
}

/// Parse effort level from database string
fn parse_effort(effort_str: &str) -> EffortLevel {
    match effort_str {
        "light" => EffortLevel::Light,
        "intense" => EffortLevel::Intense,
        _ => EffortLevel::Moderate,
    }
}

/// Format effort level for database storage
fn format_effort(effort: EffortLevel) -> &'static str {
    match effort {
        EffortLevel::Light => "light",
        EffortLevel::Moderate => "moderate",
        EffortLevel::Intense => "intense",
    }
}

/// Parse requirement kind from database string
fn parse_requirement_kind(kind_str: &str) -> RequirementKind {
    match kind_str {
        "streak" => RequirementKind::Streak,
        "total_habits" => RequirementKind::TotalHabits,
        "total_reflections" => RequirementKind::TotalReflections,
        _ => RequirementKind::TotalCompletions,
    }
}

/// Format requirement kind for database storage
fn format_requirement_kind(kind: RequirementKind) -> &'static str {
    match kind {
        RequirementKind::Streak => "streak",
        RequirementKind::TotalCompletions => "total_completions",
        RequirementKind::TotalHabits => "total_habits",
        RequirementKind::TotalReflections => "total_reflections",
    }
}

/// Profile column holding a currency balance
fn currency_column(currency: Currency) -> &'static str {
    match currency {
        Currency::Achievement => "achievement_coins",
        Currency::Engagement => "engagement_coins",
        Currency::Premium => "premium_coins",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a calendar date from ISO `YYYY-MM-DD` with fallback to today (UTC)
fn parse_date_fallback(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

/// Parse a wall-clock time from `HH:MM:SS` with fallback to midnight
fn parse_time_fallback(time_str: &str) -> NaiveTime {
    NaiveTime::parse_from_str(time_str, "%H:%M:%S").unwrap_or(NaiveTime::MIN)
}

/// Build a Profile from a database row
fn row_to_profile(row: &rusqlite::Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        user_id: row.get(0)?,
        level: row.get::<_, i64>(1)? as u32,
        current_xp: row.get(2)?,
        total_xp: row.get(3)?,
        achievement_coins: row.get(4)?,
        engagement_coins: row.get(5)?,
        premium_coins: row.get(6)?,
        engagement_reset_at: parse_datetime_fallback(&row.get::<_, String>(7)?),
        created_at: parse_datetime_fallback(&row.get::<_, String>(8)?),
    })
}

/// Build an XpTransaction from a database row
fn row_to_xp_transaction(row: &rusqlite::Row) -> Result<XpTransaction, rusqlite::Error> {
    let activity_str: String = row.get(3)?;
    let created_at_str: String = row.get(6)?;
    Ok(XpTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        activity_type: parse_activity_type(&activity_str),
        activity_id: row.get(4)?,
        description: row.get(5)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// Build an Achievement from a database row
fn row_to_achievement(row: &rusqlite::Row) -> Result<Achievement, rusqlite::Error> {
    let kind_str: String = row.get(3)?;
    Ok(Achievement {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        requirement: parse_requirement_kind(&kind_str),
        requirement_value: row.get::<_, i64>(4)? as u32,
        coin_reward: row.get(5)?,
    })
}

/// Build a ClaimedReward from a database row
fn row_to_claimed_reward(row: &rusqlite::Row) -> Result<ClaimedReward, rusqlite::Error> {
    let reward_type_str: String = row.get(2)?;
    let claim_date_str: String = row.get(3)?;
    let claimed_at_str: String = row.get(5)?;
    Ok(ClaimedReward {
        user_id: row.get(0)?,
        reward_id: row.get(1)?,
        reward_type: parse_reward_type(&reward_type_str),
        claim_date: parse_date_fallback(&claim_date_str),
        coins_claimed: row.get(4)?,
        claimed_at: parse_datetime_fallback(&claimed_at_str),
    })
}

/// Build a Reminder from a database row
fn row_to_reminder(row: &rusqlite::Row) -> Result<Reminder, rusqlite::Error> {
    let date_str: String = row.get(3)?;
    let time_str: String = row.get(4)?;
    Ok(Reminder {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        remind_date: parse_date_fallback(&date_str),
        remind_time: parse_time_fallback(&time_str),
        fired: row.get(5)?,
    })
}

/// One user's gamification profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub level: u32,
    /// XP accrued toward the next level.
    pub current_xp: i64,
    /// Lifetime XP, monotonically non-decreasing.
    pub total_xp: i64,
    pub achievement_coins: i64,
    pub engagement_coins: i64,
    pub premium_coins: i64,
    /// Last time the weekly engagement reset was applied.
    pub engagement_reset_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One tracked habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub habit_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Lifetime activity counters backing achievement checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub completions: u64,
    pub habits: u64,
    pub reflections: u64,
}

/// One logged habit completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub habit_id: String,
    pub completed_on: NaiveDate,
    pub effort: EffortLevel,
    pub created_at: DateTime<Utc>,
}

/// SQLite database for the rules engine.
///
/// Stores profiles, the XP transaction ledger, claim records, the
/// achievement catalog, and raw activity history (completions,
/// reflections, reminders).
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/habitquest/habitquest.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("habitquest.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source: e,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Wait out a writer on another connection instead of failing fast.
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        // Create base tables (v1 schema) first
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id             TEXT PRIMARY KEY,
                level               INTEGER NOT NULL DEFAULT 1,
                current_xp          INTEGER NOT NULL DEFAULT 0,
                total_xp            INTEGER NOT NULL DEFAULT 0,
                achievement_coins   INTEGER NOT NULL DEFAULT 0,
                engagement_coins    INTEGER NOT NULL DEFAULT 0,
                premium_coins       INTEGER NOT NULL DEFAULT 0,
                engagement_reset_at TEXT NOT NULL,
                created_at          TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS xp_transactions (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id       TEXT NOT NULL,
                amount        INTEGER NOT NULL,
                activity_type TEXT NOT NULL,
                activity_id   TEXT,
                description   TEXT,
                created_at    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS claimed_rewards (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id       TEXT NOT NULL,
                reward_id     TEXT NOT NULL,
                reward_type   TEXT NOT NULL,
                claim_date    TEXT NOT NULL,
                coins_claimed INTEGER NOT NULL,
                claimed_at    TEXT NOT NULL,
                UNIQUE(user_id, reward_id, claim_date)
            );

            CREATE TABLE IF NOT EXISTS user_achievements (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id        TEXT NOT NULL,
                achievement_id TEXT NOT NULL,
                coins_claimed  INTEGER NOT NULL,
                claimed_at     TEXT NOT NULL,
                UNIQUE(user_id, achievement_id)
            );

            CREATE TABLE IF NOT EXISTS achievements (
                id                TEXT PRIMARY KEY,
                title             TEXT NOT NULL,
                description       TEXT NOT NULL DEFAULT '',
                requirement_type  TEXT NOT NULL,
                requirement_value INTEGER NOT NULL,
                coin_reward       INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habits (
                user_id    TEXT NOT NULL,
                habit_id   TEXT NOT NULL,
                name       TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, habit_id)
            );

            CREATE TABLE IF NOT EXISTS habit_completions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id      TEXT NOT NULL,
                habit_id     TEXT NOT NULL,
                completed_on TEXT NOT NULL,
                created_at   TEXT NOT NULL,
                UNIQUE(user_id, habit_id, completed_on)
            );

            CREATE TABLE IF NOT EXISTS reflections (
                user_id      TEXT NOT NULL,
                reflected_on TEXT NOT NULL,
                created_at   TEXT NOT NULL,
                PRIMARY KEY (user_id, reflected_on)
            );

            CREATE INDEX IF NOT EXISTS idx_xp_transactions_user
                ON xp_transactions(user_id, id);
            CREATE INDEX IF NOT EXISTS idx_claimed_rewards_user_date
                ON claimed_rewards(user_id, claim_date);
            CREATE INDEX IF NOT EXISTS idx_habit_completions_user
                ON habit_completions(user_id, completed_on);",
        )?;

        // Run incremental migrations (v1 -> v2 -> v3, etc.)
        migrations::migrate(&self.conn)?;

        Ok(())
    }

    /// Start an immediate (write-locking) transaction on the shared connection.
    fn write_tx(&self) -> Result<Transaction<'_>, rusqlite::Error> {
        Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
    }

    // === Profiles ===

    /// Create the profile for `user_id` if it doesn't exist yet.
    ///
    /// Idempotent: an existing profile is returned unchanged.
    pub fn create_profile(&self, user_id: &str, now: DateTime<Utc>) -> Result<Profile> {
        self.conn.execute(
            "INSERT OR IGNORE INTO profiles (
                user_id, level, current_xp, total_xp,
                achievement_coins, engagement_coins, premium_coins,
                engagement_reset_at, created_at
             ) VALUES (?1, 1, 0, 0, 0, 0, 0, ?2, ?2)",
            params![user_id, now.to_rfc3339()],
        )?;
        self.require_profile(user_id)
    }

    /// Fetch a profile by user id.
    pub fn profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT user_id, level, current_xp, total_xp,
                        achievement_coins, engagement_coins, premium_coins,
                        engagement_reset_at, created_at
                 FROM profiles WHERE user_id = ?1",
                params![user_id],
                row_to_profile,
            )
            .optional()?;
        Ok(profile)
    }

    fn require_profile(&self, user_id: &str) -> Result<Profile> {
        self.profile(user_id)?.ok_or_else(|| CoreError::NotFound {
            what: "profile",
            id: user_id.to_string(),
        })
    }

    // === XP Ledger ===

    /// Apply an XP gain: advance the profile across any level thresholds
    /// crossed and append the ledger row, as one atomic unit.
    ///
    /// # Errors
    /// Returns `NotFound` if the profile doesn't exist.
    pub fn grant_xp(
        &self,
        user_id: &str,
        amount: i64,
        activity: ActivityType,
        activity_id: Option<&str>,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<XpGrant> {
        let tx = self.write_tx()?;

        let counters = tx
            .query_row(
                "SELECT level, current_xp FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;
        let Some((level, current_xp)) = counters else {
            return Err(CoreError::NotFound {
                what: "profile",
                id: user_id.to_string(),
            });
        };

        let progress = apply_gain(level as u32, current_xp, amount);

        tx.execute(
            "UPDATE profiles
             SET level = ?2, current_xp = ?3, total_xp = total_xp + ?4
             WHERE user_id = ?1",
            params![user_id, progress.level as i64, progress.current_xp, amount],
        )?;
        tx.execute(
            "INSERT INTO xp_transactions (
                user_id, amount, activity_type, activity_id, description, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                amount,
                activity.as_str(),
                activity_id,
                description,
                now.to_rfc3339(),
            ],
        )?;

        tx.commit()?;

        Ok(XpGrant {
            new_level: progress.level,
            leveled_up: progress.levels_gained > 0,
            xp_gained: amount,
        })
    }

    /// Recent XP ledger rows, newest first.
    pub fn xp_history(&self, user_id: &str, limit: u32) -> Result<Vec<XpTransaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, amount, activity_type, activity_id, description, created_at
             FROM xp_transactions
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let mut rows = stmt.query(params![user_id, limit])?;
        let mut transactions = Vec::new();
        while let Some(row) = rows.next()? {
            transactions.push(row_to_xp_transaction(row)?);
        }
        Ok(transactions)
    }

    // === Wallet ===

    /// Credit an uncapped currency (achievement or premium) and return the
    /// new balance. Engagement coins go through [`credit_engagement`]
    /// instead so the cap and weekly reset apply.
    ///
    /// [`credit_engagement`]: Database::credit_engagement
    pub fn credit_coins(&self, user_id: &str, currency: Currency, amount: i64) -> Result<i64> {
        let column = currency_column(currency);
        let tx = self.write_tx()?;

        let updated = tx.execute(
            &format!("UPDATE profiles SET {column} = {column} + ?2 WHERE user_id = ?1"),
            params![user_id, amount],
        )?;
        if updated == 0 {
            return Err(CoreError::NotFound {
                what: "profile",
                id: user_id.to_string(),
            });
        }
        let balance = tx.query_row(
            &format!("SELECT {column} FROM profiles WHERE user_id = ?1"),
            params![user_id],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(balance)
    }

    /// Credit engagement coins, applying the lazy weekly reset first and
    /// truncating at the level-dependent cap. Returns `(new_balance,
    /// was_reset)`.
    pub fn credit_engagement(
        &self,
        user_id: &str,
        amount: i64,
        config: &EconomyConfig,
        now: DateTime<Utc>,
    ) -> Result<(i64, bool)> {
        let tx = self.write_tx()?;
        let was_reset = apply_engagement_reset(&tx, user_id, config, now)?;

        let row = tx
            .query_row(
                "SELECT level, engagement_coins FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;
        let Some((level, balance)) = row else {
            return Err(CoreError::NotFound {
                what: "profile",
                id: user_id.to_string(),
            });
        };

        let cap = engagement_cap(level as u32, config);
        let new_balance = (balance + amount).min(cap);
        tx.execute(
            "UPDATE profiles SET engagement_coins = ?2 WHERE user_id = ?1",
            params![user_id, new_balance],
        )?;

        tx.commit()?;
        Ok((new_balance, was_reset))
    }

    /// Spend from a balance. Fails without mutating when funds are short.
    ///
    /// Engagement debits apply the lazy weekly reset first, so a stale
    /// balance can't be spent after the window has passed.
    ///
    /// # Errors
    /// Returns `NotFound` for a missing profile and `InsufficientFunds`
    /// when `balance < amount`.
    pub fn debit_coins(
        &self,
        user_id: &str,
        currency: Currency,
        amount: i64,
        config: &EconomyConfig,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let tx = self.write_tx()?;
        if currency == Currency::Engagement {
            apply_engagement_reset(&tx, user_id, config, now)?;
        }

        let column = currency_column(currency);
        let balance = tx
            .query_row(
                &format!("SELECT {column} FROM profiles WHERE user_id = ?1"),
                params![user_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        let Some(balance) = balance else {
            return Err(CoreError::NotFound {
                what: "profile",
                id: user_id.to_string(),
            });
        };
        if balance < amount {
            return Err(CoreError::InsufficientFunds {
                currency: currency.name(),
                balance,
                requested: amount,
            });
        }

        tx.execute(
            &format!("UPDATE profiles SET {column} = {column} - ?2 WHERE user_id = ?1"),
            params![user_id, amount],
        )?;

        tx.commit()?;
        Ok(balance - amount)
    }

    // === Claims ===

    /// Record a day-scoped claim (quest or streak milestone).
    ///
    /// # Errors
    /// Returns `AlreadyClaimed` when the `(user, reward, day)` row exists.
    pub fn record_claim(
        &self,
        user_id: &str,
        reward_id: &str,
        reward_type: RewardType,
        claim_date: NaiveDate,
        coins: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let result = self.conn.execute(
            "INSERT INTO claimed_rewards (
                user_id, reward_id, reward_type, claim_date, coins_claimed, claimed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                reward_id,
                reward_type.as_str(),
                claim_date.to_string(),
                coins,
                now.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(CoreError::AlreadyClaimed {
                    reward_id: reward_id.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record a permanent achievement claim.
    ///
    /// # Errors
    /// Returns `AlreadyClaimed` when the user already holds the achievement.
    pub fn record_user_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
        coins: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let result = self.conn.execute(
            "INSERT INTO user_achievements (user_id, achievement_id, coins_claimed, claimed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, achievement_id, coins, now.to_rfc3339()],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(CoreError::AlreadyClaimed {
                    reward_id: achievement_id.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reward ids claimed by the user on `date`.
    pub fn claimed_reward_ids_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT reward_id FROM claimed_rewards WHERE user_id = ?1 AND claim_date = ?2",
        )?;
        let mut rows = stmt.query(params![user_id, date.to_string()])?;
        let mut ids = HashSet::new();
        while let Some(row) = rows.next()? {
            ids.insert(row.get(0)?);
        }
        Ok(ids)
    }

    /// Full claim records for the user on `date`, in claim order.
    pub fn claims_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<ClaimedReward>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, reward_id, reward_type, claim_date, coins_claimed, claimed_at
             FROM claimed_rewards
             WHERE user_id = ?1 AND claim_date = ?2
             ORDER BY id ASC",
        )?;
        let mut rows = stmt.query(params![user_id, date.to_string()])?;
        let mut claims = Vec::new();
        while let Some(row) = rows.next()? {
            claims.push(row_to_claimed_reward(row)?);
        }
        Ok(claims)
    }

    /// Ids of achievements the user has permanently claimed.
    pub fn user_achievement_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT achievement_id FROM user_achievements WHERE user_id = ?1")?;
        let mut rows = stmt.query(params![user_id])?;
        let mut ids = HashSet::new();
        while let Some(row) = rows.next()? {
            ids.insert(row.get(0)?);
        }
        Ok(ids)
    }

    // === Achievement Catalog ===

    /// Seed the achievement catalog. Existing entries are left untouched,
    /// so re-seeding on startup is harmless.
    pub fn seed_achievements(&self, catalog: &[Achievement]) -> Result<()> {
        let tx = self.write_tx()?;
        for achievement in catalog {
            tx.execute(
                "INSERT OR IGNORE INTO achievements (
                    id, title, description, requirement_type, requirement_value, coin_reward
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    achievement.id,
                    achievement.title,
                    achievement.description,
                    format_requirement_kind(achievement.requirement),
                    achievement.requirement_value as i64,
                    achievement.coin_reward,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// The full achievement catalog, in seed order.
    pub fn achievements(&self) -> Result<Vec<Achievement>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, requirement_type, requirement_value, coin_reward
             FROM achievements
             ORDER BY rowid ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut catalog = Vec::new();
        while let Some(row) = rows.next()? {
            catalog.push(row_to_achievement(row)?);
        }
        Ok(catalog)
    }

    /// Fetch one catalog entry by id.
    pub fn achievement(&self, id: &str) -> Result<Option<Achievement>> {
        let achievement = self
            .conn
            .query_row(
                "SELECT id, title, description, requirement_type, requirement_value, coin_reward
                 FROM achievements WHERE id = ?1",
                params![id],
                row_to_achievement,
            )
            .optional()?;
        Ok(achievement)
    }

    // === Habits & Completions ===

    /// Register a habit if it isn't known yet. The first recorded name wins.
    pub fn upsert_habit(
        &self,
        user_id: &str,
        habit_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO habits (user_id, habit_id, name, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, habit_id, name, now.to_rfc3339()],
        )?;
        Ok(())
    }

    /// All habits the user has ever logged, oldest first.
    pub fn habits(&self, user_id: &str) -> Result<Vec<HabitRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, name, created_at FROM habits
             WHERE user_id = ?1
             ORDER BY created_at ASC, habit_id ASC",
        )?;
        let mut rows = stmt.query(params![user_id])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            let created_at_str: String = row.get(2)?;
            habits.push(HabitRecord {
                habit_id: row.get(0)?,
                name: row.get(1)?,
                created_at: parse_datetime_fallback(&created_at_str),
            });
        }
        Ok(habits)
    }

    /// Record a completion for `(habit, day)`. Returns `false` when the day
    /// was already logged (the duplicate is ignored, nothing changes).
    pub fn record_completion(
        &self,
        user_id: &str,
        habit_id: &str,
        completed_on: NaiveDate,
        effort: EffortLevel,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO habit_completions (
                user_id, habit_id, completed_on, effort, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                habit_id,
                completed_on.to_string(),
                format_effort(effort),
                now.to_rfc3339(),
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Completions logged on `date`, in log order.
    pub fn completions_log_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, completed_on, effort, created_at
             FROM habit_completions
             WHERE user_id = ?1 AND completed_on = ?2
             ORDER BY id ASC",
        )?;
        let mut rows = stmt.query(params![user_id, date.to_string()])?;
        let mut completions = Vec::new();
        while let Some(row) = rows.next()? {
            let date_str: String = row.get(1)?;
            let effort_str: String = row.get(2)?;
            let created_at_str: String = row.get(3)?;
            completions.push(CompletionRecord {
                habit_id: row.get(0)?,
                completed_on: parse_date_fallback(&date_str),
                effort: parse_effort(&effort_str),
                created_at: parse_datetime_fallback(&created_at_str),
            });
        }
        Ok(completions)
    }

    /// Number of habit completions logged on `date`.
    pub fn completions_on(&self, user_id: &str, date: NaiveDate) -> Result<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habit_completions WHERE user_id = ?1 AND completed_on = ?2",
            params![user_id, date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    /// Completion dates grouped per habit, for streak derivation.
    pub fn completion_dates(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, HashSet<NaiveDate>>> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, completed_on FROM habit_completions WHERE user_id = ?1",
        )?;
        let mut rows = stmt.query(params![user_id])?;
        let mut per_habit: HashMap<String, HashSet<NaiveDate>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let habit_id: String = row.get(0)?;
            let date_str: String = row.get(1)?;
            per_habit
                .entry(habit_id)
                .or_default()
                .insert(parse_date_fallback(&date_str));
        }
        Ok(per_habit)
    }

    // === Reflections ===

    /// Record a journal reflection for `date`. Returns `false` when one was
    /// already saved that day.
    pub fn record_reflection(
        &self,
        user_id: &str,
        reflected_on: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO reflections (user_id, reflected_on, created_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, reflected_on.to_string(), now.to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    /// Whether the user saved a reflection on `date`.
    pub fn reflection_on(&self, user_id: &str, date: NaiveDate) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reflections WHERE user_id = ?1 AND reflected_on = ?2",
            params![user_id, date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // === Stats ===

    /// Lifetime activity counters for achievement evaluation.
    pub fn activity_counts(&self, user_id: &str) -> Result<ActivityCounts> {
        let completions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habit_completions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        let habits: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        let reflections: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reflections WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(ActivityCounts {
            completions: completions as u64,
            habits: habits as u64,
            reflections: reflections as u64,
        })
    }

    // === Reminders ===

    /// Store a reminder.
    pub fn add_reminder(&self, reminder: &Reminder) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reminders (id, user_id, title, remind_date, remind_time, fired)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                reminder.id,
                reminder.user_id,
                reminder.title,
                reminder.remind_date.to_string(),
                reminder.remind_time.format("%H:%M:%S").to_string(),
                reminder.fired,
            ],
        )?;
        Ok(())
    }

    /// All reminders for the user, soonest first.
    pub fn reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, remind_date, remind_time, fired
             FROM reminders
             WHERE user_id = ?1
             ORDER BY remind_date ASC, remind_time ASC",
        )?;
        let mut rows = stmt.query(params![user_id])?;
        let mut reminders = Vec::new();
        while let Some(row) = rows.next()? {
            reminders.push(row_to_reminder(row)?);
        }
        Ok(reminders)
    }

    /// Reminders scheduled for `date`, by time.
    pub fn reminders_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, remind_date, remind_time, fired
             FROM reminders
             WHERE user_id = ?1 AND remind_date = ?2
             ORDER BY remind_time ASC",
        )?;
        let mut rows = stmt.query(params![user_id, date.to_string()])?;
        let mut reminders = Vec::new();
        while let Some(row) = rows.next()? {
            reminders.push(row_to_reminder(row)?);
        }
        Ok(reminders)
    }

    /// Mark a reminder as fired so the composer stops surfacing it.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown reminder id.
    pub fn mark_reminder_fired(&self, user_id: &str, reminder_id: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE reminders SET fired = 1 WHERE user_id = ?1 AND id = ?2",
            params![user_id, reminder_id],
        )?;
        if updated == 0 {
            return Err(CoreError::NotFound {
                what: "reminder",
                id: reminder_id.to_string(),
            });
        }
        Ok(())
    }
}

/// Apply the lazy weekly engagement reset inside an open transaction.
///
/// Returns whether the reset fired. A missing profile is left for the
/// caller's own read to surface as `NotFound`.
fn apply_engagement_reset(
    tx: &Transaction<'_>,
    user_id: &str,
    config: &EconomyConfig,
    now: DateTime<Utc>,
) -> Result<bool> {
    let reset_at = tx
        .query_row(
            "SELECT engagement_reset_at FROM profiles WHERE user_id = ?1",
            params![user_id],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    let Some(reset_at_str) = reset_at else {
        return Ok(false);
    };

    if needs_weekly_reset(parse_datetime_fallback(&reset_at_str), now, config) {
        tx.execute(
            "UPDATE profiles SET engagement_coins = 0, engagement_reset_at = ?2
             WHERE user_id = ?1",
            params![user_id, now.to_rfc3339()],
        )?;
        Ok(true)
    } else {
        Ok(false)
    }
}
