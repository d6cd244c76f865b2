// Command dispatcher
//
// Resolves a typed command into an intent and executes it against the
// stores. Replies are plain sentences; storage failures bubble up to the
// CLI boundary.

use crate::db::{generate_id, Database, Note, Reminder, Task};
use crate::error::Result;
use crate::intelligence::{Analyzer, Classifier};
use crate::intent::{resolve, Details, EntityType, IntentKind};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

/// How many hits a search reply lists before truncating
const SEARCH_REPLY_LIMIT: usize = 5;

/// Executes resolved intents against the task, note, and reminder stores
pub struct Assistant {
    db: Arc<Database>,
    analyzer: Analyzer,
    classifier: Classifier,
}

impl Assistant {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            analyzer: Analyzer::new(Arc::clone(&db)),
            classifier: Classifier::new(),
            db,
        }
    }

    /// Handle a command anchored on the local calendar date
    pub async fn handle(&self, command: &str) -> Result<String> {
        self.handle_on(command, Local::now().date_naive()).await
    }

    /// Handle a command anchored on an explicit date
    pub async fn handle_on(&self, command: &str, today: NaiveDate) -> Result<String> {
        let intent = resolve(command, today);
        debug!(
            action = intent.kind.action(),
            entity = %intent.kind.entity(),
            "command resolved"
        );

        match &intent.kind {
            IntentKind::Create { entity, details } => match entity {
                EntityType::Task => self.create_task(details, today, false).await,
                EntityType::Event => self.create_task(details, today, true).await,
                EntityType::Note => self.create_note(details).await,
                EntityType::Reminder => self.create_reminder(details, today).await,
            },
            IntentKind::Search { entity, details, .. } => match entity {
                EntityType::Task => self.search_tasks(details).await,
                EntityType::Event => self.search_events().await,
                EntityType::Note => self.search_notes().await,
                EntityType::Reminder => self.search_reminders().await,
            },
            IntentKind::Update { .. } => Ok(
                "I understand you want to update something. This functionality is coming soon."
                    .to_string(),
            ),
            IntentKind::Delete { .. } => Ok(
                "I understand you want to delete something. This functionality is coming soon."
                    .to_string(),
            ),
        }
    }

    async fn create_task(
        &self,
        details: &Details,
        today: NaiveDate,
        is_event: bool,
    ) -> Result<String> {
        let fallback = if is_event { "New Event" } else { "New Task" };
        let title = details.title.clone().unwrap_or_else(|| fallback.to_string());

        let mut task = Task::new(generate_id(), title);
        if let Some(priority) = details.priority {
            task.priority = priority.as_str().to_string();
        }
        task.category = Some(self.classifier.categorize(&task.text()).id().to_string());
        let tags = self.classifier.suggest_tags(&task.text());
        if !tags.is_empty() {
            task.set_tags(tags)?;
        }

        if is_event {
            // Events always carry a date and a default time slot
            task.is_event = true;
            task.due_date = Some(details.date.unwrap_or(today).format("%Y-%m-%d").to_string());
            task.due_time = Some("12:00".to_string());
        } else {
            task.due_date = details.date.map(|d| d.format("%Y-%m-%d").to_string());
        }

        self.db.insert_task(&task).await?;
        // Keep the suggestion cache in step with the collection
        self.analyzer.refresh(today).await;

        let reply = match (&task.due_date, is_event) {
            (Some(date), true) => {
                format!("Created a new event: \"{}\" on {}.", task.title, date)
            }
            (Some(date), false) => {
                format!("Created a new task: \"{}\" on {}.", task.title, date)
            }
            (None, _) => format!("Created a new task: \"{}\".", task.title),
        };
        Ok(reply)
    }

    async fn create_note(&self, details: &Details) -> Result<String> {
        let content = details.title.clone().unwrap_or_default();
        let title = if content.is_empty() {
            "New Note".to_string()
        } else {
            // Note titles are the first five words of the content
            content
                .split_whitespace()
                .take(5)
                .collect::<Vec<_>>()
                .join(" ")
        };

        let note = Note {
            id: generate_id(),
            title,
            content,
            color: "#ffffff".to_string(),
            is_archived: false,
            created_at: String::new(),
        };
        self.db.insert_note(&note).await?;

        Ok(format!("Created a new note: \"{}\"", note.title))
    }

    async fn create_reminder(&self, details: &Details, today: NaiveDate) -> Result<String> {
        let reminder = Reminder {
            id: generate_id(),
            title: details
                .title
                .clone()
                .unwrap_or_else(|| "New Reminder".to_string()),
            due_date: details.date.unwrap_or(today).format("%Y-%m-%d").to_string(),
            due_time: "12:00".to_string(),
            frequency: "once".to_string(),
            priority: details
                .priority
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| "medium".to_string()),
            is_completed: false,
            created_at: String::new(),
        };
        self.db.insert_reminder(&reminder).await?;

        Ok(format!(
            "Created a new reminder: \"{}\" on {}.",
            reminder.title, reminder.due_date
        ))
    }

    async fn search_tasks(&self, details: &Details) -> Result<String> {
        let tasks = self.db.get_all_tasks().await?;

        let mut filtered: Vec<&Task> = tasks.iter().filter(|t| !t.is_event).collect();
        if let Some(priority) = details.priority {
            filtered.retain(|t| t.priority == priority.as_str());
        }
        if let Some(date) = details.date {
            let iso = date.format("%Y-%m-%d").to_string();
            filtered.retain(|t| t.due_date.as_deref() == Some(iso.as_str()));
        }

        if filtered.is_empty() {
            return Ok("I couldn't find any tasks matching your criteria.".to_string());
        }

        let mut reply = format!("Found {} task(s):\n", filtered.len());
        for task in filtered.iter().take(SEARCH_REPLY_LIMIT) {
            match &task.due_date {
                Some(date) => reply.push_str(&format!("- {} (due: {})\n", task.title, date)),
                None => reply.push_str(&format!("- {}\n", task.title)),
            }
        }
        if filtered.len() > SEARCH_REPLY_LIMIT {
            reply.push_str(&format!(
                "... and {} more.",
                filtered.len() - SEARCH_REPLY_LIMIT
            ));
        }

        Ok(reply.trim_end().to_string())
    }

    async fn search_events(&self) -> Result<String> {
        let tasks = self.db.get_all_tasks().await?;
        let events: Vec<&Task> = tasks.iter().filter(|t| t.is_event).collect();

        if events.is_empty() {
            return Ok("You don't have any events yet.".to_string());
        }

        let mut reply = format!("Found {} event(s):\n", events.len());
        for event in events.iter().take(SEARCH_REPLY_LIMIT) {
            let date = event.due_date.as_deref().unwrap_or("unscheduled");
            match event.due_time.as_deref() {
                Some(time) if !time.is_empty() => {
                    reply.push_str(&format!("- {} ({} {})\n", event.title, date, time))
                }
                _ => reply.push_str(&format!("- {} ({})\n", event.title, date)),
            }
        }
        if events.len() > SEARCH_REPLY_LIMIT {
            reply.push_str(&format!("... and {} more.", events.len() - SEARCH_REPLY_LIMIT));
        }

        Ok(reply.trim_end().to_string())
    }

    async fn search_notes(&self) -> Result<String> {
        let notes = self.db.get_all_notes().await?;

        if notes.is_empty() {
            return Ok("You don't have any notes yet.".to_string());
        }

        let mut reply = format!("Found {} note(s):\n", notes.len());
        for note in notes.iter().take(SEARCH_REPLY_LIMIT) {
            reply.push_str(&format!("- {}\n", note.title));
        }
        if notes.len() > SEARCH_REPLY_LIMIT {
            reply.push_str(&format!("... and {} more.", notes.len() - SEARCH_REPLY_LIMIT));
        }

        Ok(reply.trim_end().to_string())
    }

    async fn search_reminders(&self) -> Result<String> {
        let reminders = self.db.get_all_reminders().await?;

        if reminders.is_empty() {
            return Ok("You don't have any reminders yet.".to_string());
        }

        let mut reply = format!("Found {} reminder(s):\n", reminders.len());
        for reminder in reminders.iter().take(SEARCH_REPLY_LIMIT) {
            reply.push_str(&format!(
                "- {} ({} {})\n",
                reminder.title, reminder.due_date, reminder.due_time
            ));
        }
        if reminders.len() > SEARCH_REPLY_LIMIT {
            reply.push_str(&format!(
                "... and {} more.",
                reminders.len() - SEARCH_REPLY_LIMIT
            ));
        }

        Ok(reply.trim_end().to_string())
    }
}
