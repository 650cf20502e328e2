//! Core error types for habitquest-core.
//!
//! This module defines the error hierarchy using thiserror. Domain errors
//! (NotFound, AlreadyClaimed, InsufficientFunds) are recoverable by the
//! caller: the operation did not apply its effect and state is unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced record (profile, achievement, reminder) does not exist
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// Claim uniqueness violated -- day-scoped or permanent
    #[error("Reward '{reward_id}' already claimed")]
    AlreadyClaimed { reward_id: String },

    /// Debit exceeds the current balance
    #[error("Insufficient {currency} balance: have {balance}, need {requested}")]
    InsufficientFunds {
        currency: &'static str,
        balance: i64,
        requested: i64,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A uniqueness or check constraint rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Amount must be positive
    #[error("Invalid amount for '{field}': {value} (must be > 0)")]
    InvalidAmount { field: &'static str, value: i64 },

    /// Unknown activity type tag
    #[error("Unknown activity type: {0}")]
    UnknownActivity(String),

    /// Unknown reward id for the requested reward type
    #[error("Unknown reward id: {0}")]
    UnknownReward(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) => match e.code {
                rusqlite::ErrorCode::ConstraintViolation => {
                    DatabaseError::ConstraintViolation(
                        msg.clone().unwrap_or_else(|| e.to_string()),
                    )
                }
                rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy => {
                    DatabaseError::Locked
                }
                _ => DatabaseError::QueryFailed(err.to_string()),
            },
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(DatabaseError::from(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

impl CoreError {
    /// True for the expected, caller-recoverable outcomes (the operation
    /// simply did not apply; surface a message and move on).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::NotFound { .. }
                | CoreError::AlreadyClaimed { .. }
                | CoreError::InsufficientFunds { .. }
                | CoreError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_maps_from_sqlite() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ErrorCode::ConstraintViolation,
                extended_code: 2067, // SQLITE_CONSTRAINT_UNIQUE
            },
            Some("UNIQUE constraint failed: claimed_rewards".to_string()),
        );
        match DatabaseError::from(err) {
            DatabaseError::ConstraintViolation(msg) => {
                assert!(msg.contains("claimed_rewards"));
            }
            other => panic!("expected ConstraintViolation, got {other:?}"),
        }
    }

    #[test]
    fn recoverable_classification() {
        assert!(CoreError::AlreadyClaimed {
            reward_id: "daily_login".into()
        }
        .is_recoverable());
        assert!(CoreError::InsufficientFunds {
            currency: "engagement",
            balance: 3,
            requested: 10
        }
        .is_recoverable());
        assert!(!CoreError::Database(DatabaseError::Locked).is_recoverable());
    }
}
