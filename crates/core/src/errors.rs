//! Error types for prompt-vault
//!
//! Every fallible operation in the crate returns [`Result`]. Storage faults are
//! logged where they happen and then handed back to the caller, so a
//! presentation client can show a message without the process ever panicking.

use thiserror::Error;

/// Result type alias for prompt-vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Main error type for prompt-vault
#[derive(Debug, Error)]
pub enum VaultError {
    /// Command not found in registry
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid command arguments
    #[error("Invalid arguments for command '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Attempt to delete or overwrite a record owned by the bundled definition file
    #[error("Prompt {0} is built-in and cannot be deleted or overwritten")]
    BuiltinProtected(i64),

    /// No record with the given numeric key
    #[error("Prompt {0} not found")]
    NotFound(i64),

    /// Generic error (catch-all)
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for VaultError {
    fn from(err: anyhow::Error) -> Self {
        VaultError::Other(err.to_string())
    }
}

impl From<String> for VaultError {
    fn from(err: String) -> Self {
        VaultError::Other(err)
    }
}

impl From<&str> for VaultError {
    fn from(err: &str) -> Self {
        VaultError::Other(err.to_string())
    }
}

impl VaultError {
    /// Get user-friendly error message for display
    pub fn user_message(&self) -> String {
        match self {
            VaultError::CommandNotFound(cmd) => {
                format!(
                    "Command '{}' not found. Run `prompt-vault commands` for available commands.",
                    cmd
                )
            },
            VaultError::InvalidArgs { command, reason } => {
                format!("Invalid arguments for '{}': {}", command, reason)
            },
            VaultError::SerdeError(err) => {
                format!("The file is not valid prompt JSON: {}", err)
            },
            VaultError::DatabaseError(err) => {
                format!("Database error: {}", err)
            },
            VaultError::ValidationError(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            VaultError::CommandNotFound(_) => "command",
            VaultError::InvalidArgs { .. } => "arguments",
            VaultError::SerdeError(_) => "serialization",
            VaultError::DatabaseError(_) => "database",
            VaultError::IoError(_) => "io",
            VaultError::ConfigError(_) => "config",
            VaultError::ValidationError(_) => "validation",
            VaultError::BuiltinProtected(_) => "builtin",
            VaultError::NotFound(_) => "not_found",
            VaultError::Other(_) => "other",
        }
    }
}
