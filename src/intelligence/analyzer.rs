// Suggestion analyzer
//
// Owns the read-analyze-cache cycle and the accept/dismiss lifecycle.
// Analysis itself never fails: storage or serialization trouble during a
// refresh is logged and the caller gets an empty report.

use crate::db::{generate_id, Database};
use crate::error::{Result, SageError};
use crate::intelligence::classifier::Classifier;
use crate::intelligence::patterns::{
    detect_categorical, detect_forgotten, detect_recurring, detect_related, CategoryStats,
    ForgottenTask, RecurringPattern, RelatedPair,
};
use crate::intelligence::suggestions::{build_suggestions, Suggestion, SuggestionKind};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything one analysis pass found
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub recurring: Vec<RecurringPattern>,
    pub related: Vec<RelatedPair>,
    pub forgotten: Vec<ForgottenTask>,
    pub categorical: Vec<CategoryStats>,
    pub suggestions: Vec<Suggestion>,
}

/// Runs the detectors over stored tasks and manages the suggestion cache
pub struct Analyzer {
    db: Arc<Database>,
    classifier: Classifier,
}

impl Analyzer {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            classifier: Classifier::new(),
        }
    }

    /// Re-analyze the task collection and replace the cached suggestions.
    ///
    /// Best-effort: any failure is logged and yields an empty report rather
    /// than surfacing to the caller.
    pub async fn refresh(&self, today: NaiveDate) -> AnalysisReport {
        match self.try_refresh(today).await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "suggestion analysis failed");
                AnalysisReport::default()
            }
        }
    }

    /// Refresh anchored on the local calendar date
    pub async fn refresh_now(&self) -> AnalysisReport {
        self.refresh(Local::now().date_naive()).await
    }

    async fn try_refresh(&self, today: NaiveDate) -> Result<AnalysisReport> {
        let tasks = self.db.get_all_tasks().await?;

        let report = AnalysisReport {
            recurring: detect_recurring(&tasks, &self.classifier),
            related: detect_related(&tasks),
            forgotten: detect_forgotten(&tasks, today),
            categorical: detect_categorical(&tasks, &self.classifier),
            suggestions: build_suggestions(&tasks, today, &self.classifier),
        };

        let mut entries = Vec::with_capacity(report.suggestions.len());
        for suggestion in &report.suggestions {
            entries.push((
                serde_json::to_string(suggestion)?,
                suggestion.message.clone(),
                suggestion.confidence,
            ));
        }
        self.db.replace_suggestions(&entries).await?;

        debug!(
            tasks = tasks.len(),
            suggestions = report.suggestions.len(),
            "analysis refreshed"
        );
        Ok(report)
    }

    /// Cached suggestions with their row ids, in cache order.
    ///
    /// Rows whose payload no longer parses are skipped, not fatal.
    pub async fn cached(&self) -> Result<Vec<(i64, Suggestion)>> {
        let rows = self.db.get_suggestion_rows().await?;

        let mut suggestions = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_str::<Suggestion>(&row.payload) {
                Ok(suggestion) => suggestions.push((row.id, suggestion)),
                Err(e) => warn!(id = row.id, error = %e, "skipping unreadable suggestion"),
            }
        }

        Ok(suggestions)
    }

    /// Accept a cached suggestion: create or reschedule the task it
    /// proposes, then drop it from the cache. Returns a user-facing line
    /// describing what happened.
    pub async fn accept(&self, id: i64, today: NaiveDate) -> Result<String> {
        let row = self
            .db
            .get_suggestion_row(id)
            .await?
            .ok_or(SageError::SuggestionNotFound(id))?;
        let suggestion: Suggestion = serde_json::from_str(&row.payload)?;

        let outcome = match &suggestion.kind {
            SuggestionKind::Recurring { .. } | SuggestionKind::Related { .. } => {
                // accepted_task is always Some for these variants
                let task = suggestion.accepted_task(generate_id()).ok_or_else(|| {
                    SageError::InvalidTask("suggestion does not create a task".to_string())
                })?;
                self.db.insert_task(&task).await?;
                format!("Added \"{}\" to your tasks.", task.title)
            }
            SuggestionKind::Forgotten { task_id, title, .. } => {
                let date = today.format("%Y-%m-%d").to_string();
                self.db.reschedule_task(task_id, &date).await?;
                format!("Rescheduled \"{}\" to today.", title)
            }
            SuggestionKind::Categorical { category } => {
                format!(
                    "Noted. Try adding a {} task when one comes to mind.",
                    category.display_name()
                )
            }
        };

        self.db.remove_suggestion(id).await?;
        Ok(outcome)
    }

    /// Dismiss a cached suggestion without acting on it
    pub async fn dismiss(&self, id: i64) -> Result<()> {
        self.db.remove_suggestion(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Task;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded_analyzer() -> (Analyzer, Arc<Database>) {
        let db = Arc::new(Database::new_test().await.unwrap());

        let mut overdue = Task::new("t1", "water plants");
        overdue.due_date = Some("2025-06-03".to_string());
        db.insert_task(&overdue).await.unwrap();

        (Analyzer::new(Arc::clone(&db)), db)
    }

    #[tokio::test]
    async fn test_refresh_caches_suggestions() {
        let (analyzer, db) = seeded_analyzer().await;

        let report = analyzer.refresh(day(2025, 6, 4)).await;
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.forgotten.len(), 1);

        let cached = analyzer.cached().await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].1.confidence, 0.8);

        // A second refresh replaces, never appends
        analyzer.refresh(day(2025, 6, 4)).await;
        assert_eq!(db.get_suggestion_rows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_accept_forgotten_reschedules() {
        let (analyzer, db) = seeded_analyzer().await;
        let today = day(2025, 6, 4);

        analyzer.refresh(today).await;
        let cached = analyzer.cached().await.unwrap();
        let (id, _) = cached[0].clone();

        let outcome = analyzer.accept(id, today).await.unwrap();
        assert_eq!(outcome, "Rescheduled \"water plants\" to today.");

        let task = db.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2025-06-04"));
        assert!(analyzer.cached().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accept_recurring_creates_task() {
        let db = Arc::new(Database::new_test().await.unwrap());
        for (id, due) in [("r1", "2025-05-01"), ("r2", "2025-05-08"), ("r3", "2025-05-15")] {
            let mut t = Task::new(id, "team sync meeting");
            t.due_date = Some(due.to_string());
            t.is_completed = true;
            db.insert_task(&t).await.unwrap();
        }

        let analyzer = Analyzer::new(Arc::clone(&db));
        let today = day(2025, 5, 16);
        analyzer.refresh(today).await;

        let cached = analyzer.cached().await.unwrap();
        let (id, suggestion) = cached
            .iter()
            .find(|(_, s)| matches!(s.kind, SuggestionKind::Recurring { .. }))
            .cloned()
            .unwrap();
        assert_eq!(suggestion.confidence, 0.9);

        let outcome = analyzer.accept(id, today).await.unwrap();
        assert_eq!(outcome, "Added \"team sync meeting\" to your tasks.");

        let tasks = db.get_all_tasks().await.unwrap();
        let created = tasks.iter().find(|t| !t.is_completed).unwrap();
        assert_eq!(created.due_date.as_deref(), Some("2025-05-22"));
        assert_eq!(created.category.as_deref(), Some("work"));
    }

    #[tokio::test]
    async fn test_dismiss_removes_without_side_effects() {
        let (analyzer, db) = seeded_analyzer().await;
        let today = day(2025, 6, 4);

        analyzer.refresh(today).await;
        let cached = analyzer.cached().await.unwrap();
        analyzer.dismiss(cached[0].0).await.unwrap();

        assert!(analyzer.cached().await.unwrap().is_empty());
        // The overdue task is untouched
        let task = db.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2025-06-03"));
    }

    #[tokio::test]
    async fn test_accept_unknown_id_errors() {
        let (analyzer, _db) = seeded_analyzer().await;

        let err = analyzer.accept(9999, day(2025, 6, 4)).await.unwrap_err();
        assert!(matches!(err, SageError::SuggestionNotFound(9999)));
    }
}
