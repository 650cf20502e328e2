//! CLI subcommand implementations.

pub mod achievements;
pub mod claim;
pub mod config;
pub mod habit;
pub mod journal;
pub mod login;
pub mod notify;
pub mod post;
pub mod profile;
pub mod reminder;
pub mod streak;
pub mod wallet;
