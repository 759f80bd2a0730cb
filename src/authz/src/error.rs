//! Error types for the authorization core
//!
//! The evaluator itself never fails; these errors come from the layers
//! around it (session carrier, query parsing, policy loading).

use thiserror::Error;

/// Authorization errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Evaluation attempted before a subject/policy pair was published
    #[error("Session not initialized: evaluation requires a subject and policy")]
    SessionNotInitialized,

    /// Query names none of role, permission or permissions
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid policy definition
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
