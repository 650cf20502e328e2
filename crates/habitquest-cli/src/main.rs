use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitquest-cli", version, about = "HabitQuest CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Habit logging
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Journal reflections
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Record a login event
    Login {
        /// User id
        user_id: String,
    },
    /// Record a community post
    Post {
        /// User id
        user_id: String,
    },
    /// Claim a quest, streak, or achievement reward
    Claim {
        /// User id
        user_id: String,
        /// Reward type: quest, streak, or achievement
        reward_type: String,
        /// Reward id, e.g. "daily_login" or "streak_7"
        reward_id: String,
    },
    /// Wallet balances and spending
    Wallet {
        #[command(subcommand)]
        action: commands::wallet::WalletAction,
    },
    /// Notification feed
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Current streaks
    Streak {
        /// User id
        user_id: String,
    },
    /// Achievement catalog and progress
    Achievements {
        #[command(subcommand)]
        action: commands::achievements::AchievementsAction,
    },
    /// Reminder scheduling
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Engine configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Journal { action } => commands::journal::run(action),
        Commands::Login { user_id } => commands::login::run(&user_id),
        Commands::Post { user_id } => commands::post::run(&user_id),
        Commands::Claim {
            user_id,
            reward_type,
            reward_id,
        } => commands::claim::run(&user_id, &reward_type, &reward_id),
        Commands::Wallet { action } => commands::wallet::run(action),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Streak { user_id } => commands::streak::run(&user_id),
        Commands::Achievements { action } => commands::achievements::run(action),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
