//! Consecutive-day streak computation.
//!
//! Streaks are never stored; they are recomputed from the raw completion
//! history on every read so the reported value cannot drift from the
//! records that justify it. A streak counts consecutive calendar days
//! ending today: if today has no completion the streak is 0, full stop --
//! yesterday's history is irrelevant.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};

/// Current streak for one habit's completion dates, ending at `today`.
///
/// Walks backward one day at a time and stops at the first gap.
pub fn current_streak(dates: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while dates.contains(&day) {
        streak += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Best current streak across independently-tracked habits.
///
/// Each habit's streak is computed on its own dates; the reported value is
/// the maximum, not a union of days across habits.
pub fn best_streak(per_habit: &HashMap<String, HashSet<NaiveDate>>, today: NaiveDate) -> u32 {
    per_habit
        .values()
        .map(|dates| current_streak(dates, today))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dates(list: &[NaiveDate]) -> HashSet<NaiveDate> {
        list.iter().copied().collect()
    }

    #[test]
    fn today_missing_means_zero() {
        // Completions on the 10th and 11th, but today is the 12th.
        let set = dates(&[d(2026, 2, 10), d(2026, 2, 11)]);
        assert_eq!(current_streak(&set, d(2026, 2, 12)), 0);
    }

    #[test]
    fn two_consecutive_days_ending_today() {
        let set = dates(&[d(2026, 2, 11), d(2026, 2, 12)]);
        assert_eq!(current_streak(&set, d(2026, 2, 12)), 2);
    }

    #[test]
    fn stops_at_first_gap() {
        // 12th, 11th, gap on 10th, 9th present
        let set = dates(&[d(2026, 2, 9), d(2026, 2, 11), d(2026, 2, 12)]);
        assert_eq!(current_streak(&set, d(2026, 2, 12)), 2);
    }

    #[test]
    fn empty_history_is_zero() {
        assert_eq!(current_streak(&HashSet::new(), d(2026, 2, 12)), 0);
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let set = dates(&[d(2026, 1, 30), d(2026, 1, 31), d(2026, 2, 1)]);
        assert_eq!(current_streak(&set, d(2026, 2, 1)), 3);
    }

    #[test]
    fn best_streak_takes_max_not_union() {
        let mut per_habit = HashMap::new();
        // Habit a: 2-day streak ending today.
        per_habit.insert(
            "a".to_string(),
            dates(&[d(2026, 2, 11), d(2026, 2, 12)]),
        );
        // Habit b: only yesterday -- streak 0 on its own.
        per_habit.insert("b".to_string(), dates(&[d(2026, 2, 11)]));
        // Union of a and b would still be 2; a 3-day union across habits
        // must NOT count.
        per_habit.insert("c".to_string(), dates(&[d(2026, 2, 10)]));

        assert_eq!(best_streak(&per_habit, d(2026, 2, 12)), 2);
    }

    #[test]
    fn best_streak_with_no_habits() {
        assert_eq!(best_streak(&HashMap::new(), d(2026, 2, 12)), 0);
    }
}
