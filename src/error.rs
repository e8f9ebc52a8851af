//! Error types for the savings planner

use thiserror::Error;

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Error, Debug)]
pub enum PlannerError {

    // =============================
    // Agent Protocol Errors
    // =============================

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Retries exhausted after {attempts} attempt(s): {reason}")]
    RetryExhausted { attempts: u32, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decision round limit exceeded: {0}")]
    RoundLimitExceeded(u32),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
