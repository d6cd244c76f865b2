// Suggestion building
//
// Turns detector findings into user-facing suggestions. Pure: takes the
// task collection and a reference date, returns suggestions in detector
// order (recurring, related, forgotten, categorical).

use crate::db::Task;
use crate::intelligence::classifier::{Category, Classifier};
use crate::intelligence::patterns::{
    detect_categorical, detect_forgotten, detect_recurring, detect_related, Cadence,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const RECURRING_CONFIDENCE: f64 = 0.9;
const FORGOTTEN_CONFIDENCE: f64 = 0.8;
const RELATED_CONFIDENCE: f64 = 0.7;
const CATEGORICAL_CONFIDENCE: f64 = 0.6;

/// Recency window for the related-task trigger, in days
const RELATED_WINDOW_DAYS: i64 = 7;

/// Recency window for the categorical nudge, in days
const CATEGORY_WINDOW_DAYS: i64 = 14;

/// Minimum dated tasks inside the categorical window before the nudge can
/// fire at all
const MIN_WINDOW_TOTAL: usize = 5;

/// Completion rate above which a category counts as a habit
const HIGH_COMPLETION_RATE: f64 = 0.7;

/// Recent share below which a habit category counts as neglected
const LOW_RECENT_SHARE: f64 = 0.1;

/// What a suggestion proposes, keyed by its origin detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SuggestionKind {
    Recurring {
        title: String,
        suggested_date: NaiveDate,
        cadence: Cadence,
        category: Category,
        tags: Vec<String>,
    },
    Related {
        title: String,
        suggested_date: NaiveDate,
        related_to: String,
    },
    Forgotten {
        task_id: String,
        title: String,
        original_date: NaiveDate,
        days_past: i64,
    },
    Categorical {
        category: Category,
    },
}

/// A suggestion ready to show, cache, accept, or dismiss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(flatten)]
    pub kind: SuggestionKind,
    pub confidence: f64,
    pub message: String,
}

impl Suggestion {
    /// Build the task an accepted suggestion creates. Forgotten and
    /// categorical suggestions do not create tasks.
    pub fn accepted_task(&self, id: String) -> Option<Task> {
        match &self.kind {
            SuggestionKind::Recurring {
                title,
                suggested_date,
                category,
                tags,
                ..
            } => {
                let mut task = Task::new(id, title.clone());
                task.due_date = Some(suggested_date.format("%Y-%m-%d").to_string());
                task.category = Some(category.id().to_string());
                let _ = task.set_tags(tags.clone());
                Some(task)
            }
            SuggestionKind::Related {
                title,
                suggested_date,
                ..
            } => {
                let mut task = Task::new(id, title.clone());
                task.due_date = Some(suggested_date.format("%Y-%m-%d").to_string());
                task.category = Some(Category::Other.id().to_string());
                Some(task)
            }
            SuggestionKind::Forgotten { .. } | SuggestionKind::Categorical { .. } => None,
        }
    }
}

/// Run all four detectors and build their suggestions.
///
/// The same task may back suggestions from several detectors; no dedup
/// happens across them.
pub fn build_suggestions(
    tasks: &[Task],
    today: NaiveDate,
    classifier: &Classifier,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for pattern in detect_recurring(tasks, classifier) {
        // Mean gap rounded to the nearest whole day, ties to even
        let next = pattern.last_date + Duration::days(pattern.interval_days.round_ties_even() as i64);

        let exists = tasks.iter().any(|t| {
            t.title_key() == pattern.title.to_lowercase() && t.due() == Some(next)
        });
        if exists {
            continue;
        }

        suggestions.push(Suggestion {
            message: format!(
                "You have a {} \"{}\" task.",
                pattern.cadence, pattern.title
            ),
            confidence: RECURRING_CONFIDENCE,
            kind: SuggestionKind::Recurring {
                title: pattern.title,
                suggested_date: next,
                cadence: pattern.cadence,
                category: pattern.category,
                tags: pattern.tags,
            },
        });
    }

    let related_floor = today - Duration::days(RELATED_WINDOW_DAYS);
    for pair in detect_related(tasks) {
        // The pair triggers only when exactly one of its titles showed up
        // recently; two recent halves means nothing is missing
        let recent: Vec<(&Task, NaiveDate)> = tasks
            .iter()
            .filter(|t| pair.titles.contains(&t.title))
            .filter_map(|t| t.due().map(|due| (t, due)))
            .filter(|(_, due)| *due >= related_floor)
            .collect();

        let [(existing, due)] = recent.as_slice() else {
            continue;
        };

        let missing = if pair.titles[0] == existing.title {
            &pair.titles[1]
        } else {
            &pair.titles[0]
        };

        let already_planned = tasks
            .iter()
            .any(|t| t.title == *missing && t.due().is_some_and(|d| d >= today));
        if already_planned {
            continue;
        }

        suggestions.push(Suggestion {
            message: format!(
                "You often do \"{}\" when you do \"{}\".",
                missing, existing.title
            ),
            confidence: RELATED_CONFIDENCE,
            kind: SuggestionKind::Related {
                title: missing.clone(),
                suggested_date: *due,
                related_to: existing.title.clone(),
            },
        });
    }

    for forgotten in detect_forgotten(tasks, today) {
        let unit = if forgotten.days_past > 1 { "days" } else { "day" };
        suggestions.push(Suggestion {
            message: format!(
                "You missed \"{}\" {} {} ago.",
                forgotten.title, forgotten.days_past, unit
            ),
            confidence: FORGOTTEN_CONFIDENCE,
            kind: SuggestionKind::Forgotten {
                task_id: forgotten.task_id,
                title: forgotten.title,
                original_date: forgotten.due_date,
                days_past: forgotten.days_past,
            },
        });
    }

    let category_floor = today - Duration::days(CATEGORY_WINDOW_DAYS);
    let recent_categories: Vec<Category> = tasks
        .iter()
        .filter(|t| t.due().is_some_and(|due| due >= category_floor))
        .map(|t| classifier.category_of(t))
        .collect();

    if recent_categories.len() >= MIN_WINDOW_TOTAL {
        for stats in detect_categorical(tasks, classifier) {
            if stats.completion_rate <= HIGH_COMPLETION_RATE {
                continue;
            }
            let recent_count = recent_categories
                .iter()
                .filter(|c| **c == stats.category)
                .count();
            let share = recent_count as f64 / recent_categories.len() as f64;
            if share >= LOW_RECENT_SHARE {
                continue;
            }

            suggestions.push(Suggestion {
                message: format!(
                    "You haven't added any {} tasks recently. Consider adding some.",
                    stats.category.display_name()
                ),
                confidence: CATEGORICAL_CONFIDENCE,
                kind: SuggestionKind::Categorical {
                    category: stats.category,
                },
            });
        }
    }

    suggestions
}
