// Pattern detectors over the task collection
//
// Each detector is a pure function from a task slice to findings. Grouping
// always preserves insertion order of first appearance so that detector
// output is stable across runs on the same input.

use crate::db::Task;
use crate::intelligence::classifier::{Category, Classifier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum tasks sharing a title before a recurring pattern is considered
const MIN_RECURRING_GROUP: usize = 2;

/// Minimum co-occurrences before two titles count as related
const MIN_RELATED_COUNT: usize = 2;

/// Minimum tasks in a category before its habits are worth reporting
const MIN_CATEGORY_COUNT: usize = 3;

/// Named cadence buckets for average day gaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Cadence {
    /// Bucket an average gap in days; gaps outside every bucket carry no
    /// cadence and the group is not recurring
    pub fn classify(avg_days: f64) -> Option<Cadence> {
        match avg_days {
            d if (6.0..=8.0).contains(&d) => Some(Cadence::Weekly),
            d if (13.0..=15.0).contains(&d) => Some(Cadence::Biweekly),
            d if (28.0..=31.0).contains(&d) => Some(Cadence::Monthly),
            d if (89.0..=93.0).contains(&d) => Some(Cadence::Quarterly),
            d if (364.0..=366.0).contains(&d) => Some(Cadence::Yearly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Weekly => "weekly",
            Cadence::Biweekly => "biweekly",
            Cadence::Monthly => "monthly",
            Cadence::Quarterly => "quarterly",
            Cadence::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A title that repeats on a recognizable cadence
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringPattern {
    /// Title as written on the earliest occurrence
    pub title: String,
    /// Mean gap between consecutive occurrences, in days
    pub interval_days: f64,
    pub cadence: Cadence,
    /// Due date of the latest occurrence
    pub last_date: NaiveDate,
    pub category: Category,
    pub tags: Vec<String>,
}

/// Two titles that keep landing on the same due date
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedPair {
    /// The pair, sorted lexicographically
    pub titles: [String; 2],
    /// Number of shared due dates
    pub count: usize,
}

/// An incomplete task whose due date has passed
#[derive(Debug, Clone, PartialEq)]
pub struct ForgottenTask {
    pub task_id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub days_past: i64,
}

/// Completion habits for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: Category,
    pub count: usize,
    pub completed: usize,
    pub completion_rate: f64,
}

/// Find titles that repeat on a steady cadence.
///
/// Tasks group by case-insensitive title; only dated occurrences count. A
/// group needs at least two dated members, and its mean gap must land in a
/// cadence bucket.
pub fn detect_recurring(tasks: &[Task], classifier: &Classifier) -> Vec<RecurringPattern> {
    let mut groups: Vec<(String, Vec<(NaiveDate, &Task)>)> = Vec::new();

    for task in tasks {
        let Some(due) = task.due() else { continue };
        let key = task.title_key();
        match groups.iter().position(|(k, _)| *k == key) {
            Some(i) => groups[i].1.push((due, task)),
            None => groups.push((key, vec![(due, task)])),
        }
    }

    let mut patterns = Vec::new();

    for (_, mut members) in groups {
        if members.len() < MIN_RECURRING_GROUP {
            continue;
        }
        members.sort_by_key(|(due, _)| *due);

        let gaps: Vec<i64> = members
            .windows(2)
            .map(|pair| (pair[1].0 - pair[0].0).num_days())
            .collect();
        let avg = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

        let Some(cadence) = Cadence::classify(avg) else {
            continue;
        };

        let (_, first) = members[0];
        let (last_date, _) = members[members.len() - 1];

        patterns.push(RecurringPattern {
            title: first.title.clone(),
            interval_days: avg,
            cadence,
            last_date,
            category: classifier.category_of(first),
            tags: first.get_tags(),
        });
    }

    patterns
}

/// Find pairs of distinct titles that share a due date at least twice.
pub fn detect_related(tasks: &[Task]) -> Vec<RelatedPair> {
    let mut clusters: Vec<(NaiveDate, Vec<&Task>)> = Vec::new();

    for task in tasks {
        let Some(due) = task.due() else { continue };
        match clusters.iter().position(|(d, _)| *d == due) {
            Some(i) => clusters[i].1.push(task),
            None => clusters.push((due, vec![task])),
        }
    }

    let mut pairs: Vec<RelatedPair> = Vec::new();

    for (_, members) in &clusters {
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let (a, b) = (&members[i].title, &members[j].title);
                if a == b {
                    continue;
                }
                let mut titles = [a.clone(), b.clone()];
                titles.sort();

                match pairs.iter().position(|p| p.titles == titles) {
                    Some(i) => pairs[i].count += 1,
                    None => pairs.push(RelatedPair { titles, count: 1 }),
                }
            }
        }
    }

    pairs.retain(|p| p.count >= MIN_RELATED_COUNT);
    pairs
}

/// Find incomplete tasks whose due date is strictly before today.
pub fn detect_forgotten(tasks: &[Task], today: NaiveDate) -> Vec<ForgottenTask> {
    tasks
        .iter()
        .filter(|task| !task.is_completed)
        .filter_map(|task| {
            let due = task.due()?;
            (due < today).then(|| ForgottenTask {
                task_id: task.id.clone(),
                title: task.title.clone(),
                due_date: due,
                days_past: (today - due).num_days(),
            })
        })
        .collect()
}

/// Compute completion habits per category, for categories with at least
/// three tasks.
pub fn detect_categorical(tasks: &[Task], classifier: &Classifier) -> Vec<CategoryStats> {
    let mut tallies: Vec<(Category, usize, usize)> = Vec::new();

    for task in tasks {
        let category = classifier.category_of(task);
        let idx = match tallies.iter().position(|(c, _, _)| *c == category) {
            Some(i) => i,
            None => {
                tallies.push((category, 0, 0));
                tallies.len() - 1
            }
        };
        tallies[idx].1 += 1;
        if task.is_completed {
            tallies[idx].2 += 1;
        }
    }

    tallies
        .into_iter()
        .filter(|(_, count, _)| *count >= MIN_CATEGORY_COUNT)
        .map(|(category, count, completed)| CategoryStats {
            category,
            count,
            completed,
            completion_rate: completed as f64 / count as f64,
        })
        .collect()
}
