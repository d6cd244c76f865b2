/// Error types for tasksage
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.
///
/// The analytical core (intent resolution, pattern detection, classification)
/// is total and never produces these; errors come from storage and the CLI
/// boundary.

use thiserror::Error;

/// Main error type for tasksage operations
#[derive(Error, Debug)]
pub enum SageError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Task not found in the store
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Suggestion not found in the cache
    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(i64),

    /// Invalid task input (empty title, bad field)
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Date string is not a valid YYYY-MM-DD date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for tasksage operations
pub type Result<T> = std::result::Result<T, SageError>;

/// Convert SageError to a user-friendly error message
impl SageError {
    pub fn user_message(&self) -> String {
        match self {
            SageError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            SageError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            SageError::TaskNotFound(id) => {
                format!("Task '{}' not found", id)
            }
            SageError::SuggestionNotFound(id) => {
                format!(
                    "Suggestion #{} not found (it may have been dismissed already)",
                    id
                )
            }
            SageError::InvalidTask(reason) => {
                format!("Invalid task: {}", reason)
            }
            SageError::InvalidDate(value) => {
                format!("'{}' is not a valid date (expected YYYY-MM-DD)", value)
            }
            SageError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            SageError::Generic(msg) => msg.clone(),
        }
    }
}
