/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.
/// Tags and subtasks are stored as JSON columns, mirroring the flat
/// key-value shape the store exposes to the UI layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A task (events are tasks with `is_event` set)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<String>, // ISO YYYY-MM-DD
    pub due_time: Option<String>,
    pub priority: String, // high | medium | low
    pub category: Option<String>,
    pub tags: Option<String>,     // JSON array
    pub subtasks: Option<String>, // JSON array of Subtask
    pub is_event: bool,
    pub is_completed: bool,
    pub created_at: String, // ISO 8601 format from SQLite
}

impl Task {
    /// Create a task with the given id and title, everything else defaulted
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            due_date: None,
            due_time: None,
            priority: "medium".to_string(),
            category: None,
            tags: None,
            subtasks: None,
            is_event: false,
            is_completed: false,
            created_at: String::new(),
        }
    }

    /// Parse tags from JSON string
    pub fn get_tags(&self) -> Vec<String> {
        self.tags
            .as_ref()
            .and_then(|t| serde_json::from_str(t).ok())
            .unwrap_or_default()
    }

    /// Set tags as JSON string
    pub fn set_tags(&mut self, tags: Vec<String>) -> Result<(), serde_json::Error> {
        self.tags = Some(serde_json::to_string(&tags)?);
        Ok(())
    }

    /// Parse subtasks from JSON string
    pub fn get_subtasks(&self) -> Vec<Subtask> {
        self.subtasks
            .as_ref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    /// Set subtasks as JSON string
    pub fn set_subtasks(&mut self, subtasks: Vec<Subtask>) -> Result<(), serde_json::Error> {
        self.subtasks = Some(serde_json::to_string(&subtasks)?);
        Ok(())
    }

    /// Due date parsed as a calendar date, if present and well-formed
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Lowercased title, used for case-insensitive grouping
    pub fn title_key(&self) -> String {
        self.title.to_lowercase()
    }

    /// Combined title + description text used by the classifier
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// An ordered step inside a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
}

/// A free-form note
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub color: String,
    pub is_archived: bool,
    pub created_at: String,
}

/// A standalone reminder
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub due_date: String,
    pub due_time: String,
    pub frequency: String,
    pub priority: String,
    pub is_completed: bool,
    pub created_at: String,
}

/// A cached suggestion row; payload is the serialized Suggestion
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SuggestionRow {
    pub id: i64,
    pub payload: String,
    pub message: String,
    pub confidence: f64,
    pub created_at: String,
}

/// Search result with fuzzy-match metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub task: Task,
    pub score: f64,
}

/// Generate a time-derived entity id, the same shape the web UI used.
///
/// Nanosecond resolution keeps ids unique when several entities are created
/// back to back.
pub fn generate_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
