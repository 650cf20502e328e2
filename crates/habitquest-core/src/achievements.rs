//! Achievement catalog and qualification evaluator.
//!
//! Achievements are reference data: the engine reads the catalog, compares
//! thresholds against a user's aggregate stats, and reports qualification.
//! Qualification is independent of claiming -- an earned achievement (one
//! with a permanent claim record) is never offered again even while the
//! stat keeps satisfying the threshold.

use serde::{Deserialize, Serialize};

/// What an achievement's threshold is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// Best current consecutive-day streak
    Streak,
    /// Lifetime habit completions
    TotalCompletions,
    /// Habits ever created
    TotalHabits,
    /// Journal reflections ever written
    TotalReflections,
}

/// One catalog entry. Externally seeded, read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirement: RequirementKind,
    pub requirement_value: u32,
    pub coin_reward: i64,
}

/// Aggregate statistics the evaluator dispatches on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_completions: u64,
    pub total_habits: u64,
    pub total_reflections: u64,
    pub best_streak: u32,
}

/// Whether the stats satisfy the achievement's threshold.
pub fn qualifies(achievement: &Achievement, stats: &UserStats) -> bool {
    let value = achievement.requirement_value as u64;
    match achievement.requirement {
        RequirementKind::Streak => stats.best_streak as u64 >= value,
        RequirementKind::TotalCompletions => stats.total_completions >= value,
        RequirementKind::TotalHabits => stats.total_habits >= value,
        RequirementKind::TotalReflections => stats.total_reflections >= value,
    }
}

/// Qualification/claim status of one achievement for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub qualifies: bool,
    pub earned: bool,
}

impl AchievementStatus {
    /// Qualifies and has never been claimed.
    pub fn claimable(&self) -> bool {
        self.qualifies && !self.earned
    }
}

fn entry(
    id: &str,
    title: &str,
    description: &str,
    requirement: RequirementKind,
    requirement_value: u32,
    coin_reward: i64,
) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        requirement,
        requirement_value,
        coin_reward,
    }
}

/// Default achievement catalog, seeded into the store on first open.
pub fn default_catalog() -> Vec<Achievement> {
    vec![
        entry(
            "first_steps",
            "First Steps",
            "Complete your first habit",
            RequirementKind::TotalCompletions,
            1,
            10,
        ),
        entry(
            "committed",
            "Committed",
            "Complete 10 habits",
            RequirementKind::TotalCompletions,
            10,
            25,
        ),
        entry(
            "century_club",
            "Century Club",
            "Complete 100 habits",
            RequirementKind::TotalCompletions,
            100,
            100,
        ),
        entry(
            "habit_collector",
            "Habit Collector",
            "Track 5 different habits",
            RequirementKind::TotalHabits,
            5,
            20,
        ),
        entry(
            "routine_architect",
            "Routine Architect",
            "Track 10 different habits",
            RequirementKind::TotalHabits,
            10,
            50,
        ),
        entry(
            "dear_diary",
            "Dear Diary",
            "Write your first reflection",
            RequirementKind::TotalReflections,
            1,
            10,
        ),
        entry(
            "reflective_mind",
            "Reflective Mind",
            "Write 30 reflections",
            RequirementKind::TotalReflections,
            30,
            75,
        ),
        entry(
            "week_warrior",
            "Week Warrior",
            "Hold a 7-day streak",
            RequirementKind::Streak,
            7,
            35,
        ),
        entry(
            "monthly_master",
            "Monthly Master",
            "Hold a 30-day streak",
            RequirementKind::Streak,
            30,
            150,
        ),
    ]
}
