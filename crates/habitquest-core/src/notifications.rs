//! Notification composition.
//!
//! Notifications are never stored. Every read recomputes the list from a
//! snapshot of authoritative state (today's activity, claim records, the
//! achievement catalog, scheduled reminders), so two reads with identical
//! underlying state produce an identical ordered list. Entry timestamps
//! derive from that state (day start, scheduled reminder time), not from
//! the wall clock at composition time.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::{self, Achievement, UserStats};
use crate::economy::rewards::{
    self, QUEST_DAILY_LOGIN, QUEST_HABIT_DONE, QUEST_REFLECTION_DONE, STREAK_MILESTONES,
};

/// Notification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    DailyLogin,
    HabitDone,
    ReflectionDone,
    StreakMilestone,
    Achievement,
    Reminder,
}

/// One derived notification descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Stable id: the reward id for claimables, the reminder id otherwise.
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub claimable: bool,
    pub claim_reward: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// A user-scheduled reminder record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub remind_date: NaiveDate,
    pub remind_time: NaiveTime,
    pub fired: bool,
}

/// Snapshot of everything the composer reads.
#[derive(Debug, Clone)]
pub struct ComposerInput {
    pub today: NaiveDate,
    /// Application calendar offset, used to anchor entry timestamps.
    pub offset: FixedOffset,
    pub habits_completed_today: u32,
    pub reflection_done_today: bool,
    pub stats: UserStats,
    /// Full achievement catalog, in catalog order.
    pub catalog: Vec<Achievement>,
    /// Achievement ids the user has permanently earned.
    pub earned: HashSet<String>,
    /// Reward ids already claimed today (quests and streak milestones).
    pub claimed_today: HashSet<String>,
    /// Today's reminders that have not fired yet.
    pub reminders: Vec<Reminder>,
}

impl ComposerInput {
    fn day_start(&self) -> DateTime<Utc> {
        self.at_time(NaiveTime::MIN)
    }

    fn at_time(&self, time: NaiveTime) -> DateTime<Utc> {
        self.today
            .and_time(time)
            .and_local_timezone(self.offset)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
    }
}

/// Compose the ordered notification list for one user.
///
/// Order: daily login, habit quest, reflection quest, streak milestones
/// (ascending threshold), claimable achievements (catalog order), then
/// today's unfired reminders by scheduled time.
pub fn compose(input: &ComposerInput) -> Vec<Notification> {
    let mut out = Vec::new();
    let day_start = input.day_start();

    if !input.claimed_today.contains(QUEST_DAILY_LOGIN) {
        let reward = rewards::quest_reward(QUEST_DAILY_LOGIN).unwrap();
        out.push(Notification {
            id: QUEST_DAILY_LOGIN.to_string(),
            kind: NotificationKind::DailyLogin,
            title: "Daily Check-In".to_string(),
            description: "Claim your daily login reward".to_string(),
            claimable: true,
            claim_reward: Some(reward.coins),
            timestamp: day_start,
        });
    }

    if input.habits_completed_today >= 1 && !input.claimed_today.contains(QUEST_HABIT_DONE) {
        let reward = rewards::quest_reward(QUEST_HABIT_DONE).unwrap();
        out.push(Notification {
            id: QUEST_HABIT_DONE.to_string(),
            kind: NotificationKind::HabitDone,
            title: "Habit Finished".to_string(),
            description: format!(
                "You completed {} habit{} today -- claim your quest reward",
                input.habits_completed_today,
                if input.habits_completed_today == 1 { "" } else { "s" }
            ),
            claimable: true,
            claim_reward: Some(reward.coins),
            timestamp: day_start,
        });
    }

    if input.reflection_done_today && !input.claimed_today.contains(QUEST_REFLECTION_DONE) {
        let reward = rewards::quest_reward(QUEST_REFLECTION_DONE).unwrap();
        out.push(Notification {
            id: QUEST_REFLECTION_DONE.to_string(),
            kind: NotificationKind::ReflectionDone,
            title: "Journal Logged".to_string(),
            description: "Today's reflection is saved -- claim your quest reward".to_string(),
            claimable: true,
            claim_reward: Some(reward.coins),
            timestamp: day_start,
        });
    }

    for threshold in STREAK_MILESTONES {
        let reward_id = rewards::milestone_reward_id(threshold);
        if input.stats.best_streak >= threshold && !input.claimed_today.contains(&reward_id) {
            let coins = rewards::milestone_coins(threshold).unwrap();
            out.push(Notification {
                id: reward_id,
                kind: NotificationKind::StreakMilestone,
                title: format!("{threshold}-Day Streak"),
                description: format!(
                    "{} days in a row -- claim your milestone reward",
                    input.stats.best_streak
                ),
                claimable: true,
                claim_reward: Some(coins),
                timestamp: day_start,
            });
        }
    }

    for achievement in &input.catalog {
        if input.earned.contains(&achievement.id) {
            continue;
        }
        if achievements::qualifies(achievement, &input.stats) {
            out.push(Notification {
                id: achievement.id.clone(),
                kind: NotificationKind::Achievement,
                title: achievement.title.clone(),
                description: achievement.description.clone(),
                claimable: true,
                claim_reward: Some(achievement.coin_reward),
                timestamp: day_start,
            });
        }
    }

    let mut reminders: Vec<&Reminder> = input
        .reminders
        .iter()
        .filter(|r| !r.fired && r.remind_date == input.today)
        .collect();
    reminders.sort_by_key(|r| r.remind_time);
    for reminder in reminders {
        out.push(Notification {
            id: reminder.id.clone(),
            kind: NotificationKind::Reminder,
            title: reminder.title.clone(),
            description: format!("Scheduled for {}", reminder.remind_time.format("%H:%M")),
            claimable: false,
            claim_reward: None,
            timestamp: input.at_time(reminder.remind_time),
        });
    }

    out
}
