//! Error types for planboard.

use crate::record::LocalId;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: LocalId },
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, id: LocalId) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Remote store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Input rejected before any local or remote change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must not be zero")]
    ZeroAmount { field: &'static str },

    #[error("{field} would take the month's totals out of range")]
    AmountOutOfRange { field: &'static str },

    #[error("Day index {day} is out of range (0-6)")]
    DayOutOfRange { day: usize },

    #[error("Index {index} is out of range ({len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid {kind} key: {input}")]
    InvalidKey { kind: &'static str, input: String },
}

/// Result type alias for planboard.
pub type Result<T> = std::result::Result<T, Error>;
