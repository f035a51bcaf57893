//! Error types for regtest-box

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Required local state (a data directory, a binary path) was missing
    /// before any subprocess was invoked.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An external command exited non-zero, could not be launched, or
    /// exceeded its timeout. Carries the captured standard-error text.
    #[error("Command failed: {stderr}")]
    CommandFailed { stderr: String },

    /// A composed operation could not complete because a dependent command
    /// failed. `context` names the node and step.
    #[error("{context}: {detail}")]
    Operation { context: String, detail: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub fn operation(context: impl Into<String>, detail: impl Into<String>) -> Self {
        ServiceError::Operation {
            context: context.into(),
            detail: detail.into(),
        }
    }

    /// The diagnostic text to surface to a caller. For command failures this
    /// is the captured stderr rather than the wrapped display form.
    pub fn detail(&self) -> &str {
        match self {
            ServiceError::Configuration(msg) => msg,
            ServiceError::CommandFailed { stderr } => stderr,
            ServiceError::Operation { detail, .. } => detail,
            ServiceError::InvalidInput(msg) => msg,
        }
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ServiceError>;
