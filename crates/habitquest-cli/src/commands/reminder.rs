//! Reminder scheduling commands.

use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use habitquest_core::RewardsEngine;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Schedule a reminder
    Add {
        /// User id
        user_id: String,
        /// Reminder text
        title: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Time (HH:MM)
        #[arg(long)]
        time: String,
    },
    /// List reminders, soonest first
    List {
        /// User id
        user_id: String,
    },
    /// Mark a reminder fired
    Fire {
        /// User id
        user_id: String,
        /// Reminder id
        reminder_id: String,
    },
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;

    match action {
        ReminderAction::Add {
            user_id,
            title,
            date,
            time,
        } => {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| format!("invalid date: {date} (expected YYYY-MM-DD)"))?;
            let time = NaiveTime::parse_from_str(&time, "%H:%M")
                .map_err(|_| format!("invalid time: {time} (expected HH:MM)"))?;
            let reminder = engine.add_reminder(&user_id, &title, date, time)?;
            println!("Reminder scheduled: {}", reminder.id);
            println!("{}", serde_json::to_string_pretty(&reminder)?);
        }
        ReminderAction::List { user_id } => {
            let reminders = engine.reminders(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&reminders)?);
        }
        ReminderAction::Fire {
            user_id,
            reminder_id,
        } => {
            engine.mark_reminder_fired(&user_id, &reminder_id)?;
            println!("Reminder fired: {reminder_id}");
        }
    }
    Ok(())
}
