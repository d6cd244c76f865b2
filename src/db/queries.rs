/// SQL query functions for database operations
///
/// All queries use sqlx for type safety. The task store is the collection
/// the suggestion analyzer reads; suggestion rows are a derived cache that
/// gets replaced wholesale on every analysis run.

use crate::db::models::*;
use crate::db::Database;
use crate::error::{Result, SageError};
use sqlx::Row;

impl Database {
    /// Insert a new task
    pub async fn insert_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, due_date, due_time, priority,
                               category, tags, subtasks, is_event, is_completed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(&task.due_time)
        .bind(&task.priority)
        .bind(&task.category)
        .bind(&task.tags)
        .bind(&task.subtasks)
        .bind(task.is_event)
        .bind(task.is_completed)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get every task, oldest first
    ///
    /// The suggestion analyzer works over the full collection, so there is
    /// no pagination here.
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at, id")
            .fetch_all(self.pool())
            .await?;

        Ok(tasks)
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(task)
    }

    /// Update every mutable field of a task
    pub async fn update_task(&self, task: &Task) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET title = ?, description = ?, due_date = ?, due_time = ?,
                             priority = ?, category = ?, tags = ?, subtasks = ?,
                             is_event = ?, is_completed = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(&task.due_time)
        .bind(&task.priority)
        .bind(&task.category)
        .bind(&task.tags)
        .bind(&task.subtasks)
        .bind(task.is_event)
        .bind(task.is_completed)
        .bind(&task.id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(SageError::TaskNotFound(task.id.clone()));
        }

        Ok(())
    }

    /// Move a task to a new due date (used when a forgotten-task suggestion
    /// is accepted)
    pub async fn reschedule_task(&self, id: &str, due_date: &str) -> Result<()> {
        let result = sqlx::query("UPDATE tasks SET due_date = ? WHERE id = ?")
            .bind(due_date)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(SageError::TaskNotFound(id.to_string()));
        }

        Ok(())
    }

    /// Toggle completion status of a task
    pub async fn toggle_completed(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE tasks SET is_completed = NOT is_completed WHERE id = ? RETURNING is_completed",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| SageError::TaskNotFound(id.to_string()))?;

        Ok(result.get(0))
    }

    /// Delete a task
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(SageError::TaskNotFound(id.to_string()));
        }

        Ok(())
    }

    /// Search tasks by title or description (case-insensitive LIKE)
    pub async fn search_tasks(&self, query: &str, limit: i64) -> Result<Vec<Task>> {
        let pattern = format!("%{}%", query);

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE title LIKE ? OR description LIKE ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(tasks)
    }

    /// Insert a new note
    pub async fn insert_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            "INSERT INTO notes (id, title, content, color, is_archived) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.color)
        .bind(note.is_archived)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get all notes, newest first
    pub async fn get_all_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>("SELECT * FROM notes ORDER BY created_at DESC")
            .fetch_all(self.pool())
            .await?;

        Ok(notes)
    }

    /// Insert a new reminder
    pub async fn insert_reminder(&self, reminder: &Reminder) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders (id, title, due_date, due_time, frequency, priority, is_completed)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reminder.id)
        .bind(&reminder.title)
        .bind(&reminder.due_date)
        .bind(&reminder.due_time)
        .bind(&reminder.frequency)
        .bind(&reminder.priority)
        .bind(reminder.is_completed)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get all reminders, soonest first
    pub async fn get_all_reminders(&self) -> Result<Vec<Reminder>> {
        let reminders =
            sqlx::query_as::<_, Reminder>("SELECT * FROM reminders ORDER BY due_date, due_time")
                .fetch_all(self.pool())
                .await?;

        Ok(reminders)
    }

    /// Replace the cached suggestion list wholesale
    ///
    /// Each entry is (payload JSON, message, confidence). The cache is
    /// derived data; the analyzer regenerates it in full on every run.
    pub async fn replace_suggestions(&self, entries: &[(String, String, f64)]) -> Result<()> {
        sqlx::query("DELETE FROM suggestions")
            .execute(self.pool())
            .await?;

        for (payload, message, confidence) in entries {
            sqlx::query(
                "INSERT INTO suggestions (payload, message, confidence) VALUES (?, ?, ?)",
            )
            .bind(payload)
            .bind(message)
            .bind(confidence)
            .execute(self.pool())
            .await?;
        }

        Ok(())
    }

    /// Get the cached suggestion list in insertion order
    pub async fn get_suggestion_rows(&self) -> Result<Vec<SuggestionRow>> {
        let rows = sqlx::query_as::<_, SuggestionRow>("SELECT * FROM suggestions ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(rows)
    }

    /// Get a single cached suggestion by id
    pub async fn get_suggestion_row(&self, id: i64) -> Result<Option<SuggestionRow>> {
        let row = sqlx::query_as::<_, SuggestionRow>("SELECT * FROM suggestions WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row)
    }

    /// Remove a single cached suggestion (accepted or dismissed)
    pub async fn remove_suggestion(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM suggestions WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(SageError::SuggestionNotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_retrieve_task() {
        let db = Database::new_test().await.unwrap();

        let mut task = Task::new("100", "Pay rent");
        task.due_date = Some("2025-03-01".to_string());
        db.insert_task(&task).await.unwrap();

        let stored = db.get_task("100").await.unwrap();
        assert!(stored.is_some());
        assert_eq!(stored.unwrap().title, "Pay rent");
    }

    #[tokio::test]
    async fn test_toggle_completed() {
        let db = Database::new_test().await.unwrap();
        db.insert_task(&Task::new("1", "Water plants")).await.unwrap();

        let completed = db.toggle_completed("1").await.unwrap();
        assert!(completed);

        let completed = db.toggle_completed("1").await.unwrap();
        assert!(!completed);
    }

    #[tokio::test]
    async fn test_toggle_missing_task() {
        let db = Database::new_test().await.unwrap();

        let result = db.toggle_completed("nope").await;
        assert!(matches!(result, Err(SageError::TaskNotFound(_))));
    }

    #[tokio::test]
    async fn test_reschedule_task() {
        let db = Database::new_test().await.unwrap();
        let mut task = Task::new("1", "Call dentist");
        task.due_date = Some("2025-01-01".to_string());
        db.insert_task(&task).await.unwrap();

        db.reschedule_task("1", "2025-02-01").await.unwrap();

        let stored = db.get_task("1").await.unwrap().unwrap();
        assert_eq!(stored.due_date.as_deref(), Some("2025-02-01"));
    }

    #[tokio::test]
    async fn test_search_tasks() {
        let db = Database::new_test().await.unwrap();

        for (id, title) in [("1", "Buy groceries"), ("2", "Buy stamps"), ("3", "Mow lawn")] {
            db.insert_task(&Task::new(id, title)).await.unwrap();
        }

        let results = db.search_tasks("buy", 10).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let db = Database::new_test().await.unwrap();
        db.insert_task(&Task::new("1", "Temp")).await.unwrap();

        db.delete_task("1").await.unwrap();
        assert!(db.get_task("1").await.unwrap().is_none());

        let result = db.delete_task("1").await;
        assert!(matches!(result, Err(SageError::TaskNotFound(_))));
    }

    #[tokio::test]
    async fn test_notes_and_reminders() {
        let db = Database::new_test().await.unwrap();

        db.insert_note(&Note {
            id: "n1".to_string(),
            title: "Gift ideas".to_string(),
            content: "socks, again".to_string(),
            color: "#ffffff".to_string(),
            is_archived: false,
            created_at: String::new(),
        })
        .await
        .unwrap();

        db.insert_reminder(&Reminder {
            id: "r1".to_string(),
            title: "Take medicine".to_string(),
            due_date: "2025-01-01".to_string(),
            due_time: "12:00".to_string(),
            frequency: "once".to_string(),
            priority: "medium".to_string(),
            is_completed: false,
            created_at: String::new(),
        })
        .await
        .unwrap();

        assert_eq!(db.get_all_notes().await.unwrap().len(), 1);
        assert_eq!(db.get_all_reminders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_suggestion_cache_replacement() {
        let db = Database::new_test().await.unwrap();

        let first = vec![("{}".to_string(), "old".to_string(), 0.5)];
        db.replace_suggestions(&first).await.unwrap();

        let second = vec![
            ("{}".to_string(), "new one".to_string(), 0.9),
            ("{}".to_string(), "new two".to_string(), 0.7),
        ];
        db.replace_suggestions(&second).await.unwrap();

        let rows = db.get_suggestion_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].message, "new one");
    }

    #[tokio::test]
    async fn test_remove_suggestion() {
        let db = Database::new_test().await.unwrap();

        db.replace_suggestions(&[("{}".to_string(), "only".to_string(), 0.8)])
            .await
            .unwrap();

        let rows = db.get_suggestion_rows().await.unwrap();
        db.remove_suggestion(rows[0].id).await.unwrap();

        assert!(db.get_suggestion_rows().await.unwrap().is_empty());
        assert!(matches!(
            db.remove_suggestion(rows[0].id).await,
            Err(SageError::SuggestionNotFound(_))
        ));
    }
}
