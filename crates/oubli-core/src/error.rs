//! Error types for oubli-core

use thiserror::Error;

/// Main error type for oubli-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be decoded back into a memory
    #[error("Corrupt memory record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("No updates provided")]
    EmptyUpdate,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for oubli-core
pub type Result<T> = std::result::Result<T, Error>;
