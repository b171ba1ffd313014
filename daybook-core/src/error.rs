//! Error types for daybook.

use thiserror::Error;

/// Errors that can occur in daybook operations.
#[derive(Error, Debug)]
pub enum DaybookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("No {kind} matches '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("'{id}' matches more than one {kind}; use a longer id")]
    Ambiguous { kind: &'static str, id: String },
}

impl DaybookError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DaybookError::Validation(msg.into())
    }
}

/// Result type alias for daybook operations.
pub type DaybookResult<T> = Result<T, DaybookError>;
