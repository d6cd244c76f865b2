/// tasksage library
///
/// Core functionality for the keyword-driven task assistant.

pub mod assistant;
pub mod db;
pub mod error;
pub mod intelligence;
pub mod intent;

// Re-exports for convenience
pub use db::Database;
pub use error::{Result, SageError};
