//! Habit logging commands.

use clap::Subcommand;
use habitquest_core::{EffortLevel, RewardsEngine};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Log a habit completion for today
    Done {
        /// User id
        user_id: String,
        /// Habit id, e.g. "water" or a UUID
        habit_id: String,
        /// Display name, recorded the first time the habit id is seen
        #[arg(long)]
        name: Option<String>,
        /// Effort level: light, moderate, or intense (default: moderate)
        #[arg(long, default_value = "moderate")]
        effort: String,
    },
    /// List tracked habits
    List {
        /// User id
        user_id: String,
    },
    /// List today's completions
    Today {
        /// User id
        user_id: String,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;

    match action {
        HabitAction::Done {
            user_id,
            habit_id,
            name,
            effort,
        } => {
            let effort = match effort.as_str() {
                "light" => EffortLevel::Light,
                "intense" => EffortLevel::Intense,
                _ => EffortLevel::Moderate,
            };
            let outcome =
                engine.on_habit_completed(&user_id, &habit_id, name.as_deref(), effort)?;
            if outcome.applied {
                println!("Habit logged: {habit_id}");
            } else {
                println!("Already logged today: {habit_id}");
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        HabitAction::List { user_id } => {
            let habits = engine.habits(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&habits)?);
        }
        HabitAction::Today { user_id } => {
            let completions = engine.completions_today(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&completions)?);
        }
    }
    Ok(())
}
