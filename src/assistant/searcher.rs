/// Task searcher with fuzzy matching
///
/// Provides fuzzy search over task titles and descriptions.

use crate::db::{Database, SearchResult};
use crate::error::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::sync::Arc;

/// Handles task searching with fuzzy matching
pub struct Searcher {
    db: Arc<Database>,
    matcher: SkimMatcherV2,
}

impl Searcher {
    /// Create a new searcher instance
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Search tasks with fuzzy matching, best matches first
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let tasks = self.db.get_all_tasks().await?;

        let mut results: Vec<SearchResult> = tasks
            .into_iter()
            .filter_map(|task| {
                self.matcher
                    .fuzzy_match(&task.text(), query)
                    .map(|score| SearchResult {
                        task,
                        score: score as f64,
                    })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit as usize);

        Ok(results)
    }
}
