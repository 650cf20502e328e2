//! Application calendar clock.
//!
//! Every day-boundary decision in the engine (daily claim windows, streak
//! day arithmetic, the weekly engagement-coin reset) resolves "today"
//! through this clock, which shifts wall time by one fixed application-wide
//! offset before truncating to a date. All users share one reset schedule
//! regardless of device timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Fixed application offset from UTC, in minutes (+05:30).
pub const APP_UTC_OFFSET_MINUTES: i32 = 330;

/// Part of the day, split at 04:00 / 12:00 / 17:00 / 21:00 shifted time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    /// Classify a shifted hour (0..=23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            4..=11 => DayPart::Morning,
            12..=16 => DayPart::Afternoon,
            17..=20 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    /// Greeting text for UI surfaces.
    pub fn greeting(&self) -> &'static str {
        match self {
            DayPart::Morning => "Good morning",
            DayPart::Afternoon => "Good afternoon",
            DayPart::Evening => "Good evening",
            DayPart::Night => "Good night",
        }
    }
}

/// Wall-clock source with a fixed calendar offset.
///
/// `Clock::system()` reads real time; `Clock::fixed(..)` pins "now" so
/// tests can place themselves on an exact calendar day.
#[derive(Debug, Clone)]
pub struct Clock {
    offset: FixedOffset,
    fixed_now: Option<DateTime<Utc>>,
}

impl Clock {
    /// Clock on real time with the application offset.
    pub fn system() -> Self {
        Self::with_offset_minutes(APP_UTC_OFFSET_MINUTES)
    }

    /// Clock on real time with a custom offset (from engine config).
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Self {
            offset,
            fixed_now: None,
        }
    }

    /// Clock pinned to a fixed instant (for tests).
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self {
            fixed_now: Some(now),
            ..Self::system()
        }
    }

    /// Pin an already-offset clock to a fixed instant.
    pub fn fixed_at(self, now: DateTime<Utc>) -> Self {
        Self {
            fixed_now: Some(now),
            ..self
        }
    }

    /// Current instant in UTC.
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// The application's fixed UTC offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar date of "now" in the application offset.
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.offset).date_naive()
    }

    /// The shifted hour of day (0..=23).
    pub fn hour_of_day(&self) -> u32 {
        self.now().with_timezone(&self.offset).hour()
    }

    /// Day part for greeting text.
    pub fn day_part(&self) -> DayPart {
        DayPart::from_hour(self.hour_of_day())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}
