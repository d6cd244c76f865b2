// Category and tag classification from task text
//
// Fixed keyword lists per category. Scoring is occurrence counting, so the
// whole thing is deterministic: same text in, same category and tags out.

use crate::db::Task;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum number of suggested tags per task
const MAX_SUGGESTED_TAGS: usize = 5;

/// Task categories, in declaration order
///
/// Declaration order matters: it breaks score ties and orders tag
/// suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Home,
    Education,
    Travel,
    Finance,
    Social,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
        Category::Home,
        Category::Education,
        Category::Travel,
        Category::Finance,
        Category::Social,
        Category::Other,
    ];

    /// Stable identifier used in storage
    pub fn id(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Home => "home",
            Category::Education => "education",
            Category::Travel => "travel",
            Category::Finance => "finance",
            Category::Social => "social",
            Category::Other => "other",
        }
    }

    /// Human-readable name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Home => "Home",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::Finance => "Finance",
            Category::Social => "Social",
            Category::Other => "Other",
        }
    }

    /// Parse a stored category id; anything unrecognized is the "other"
    /// sentinel, never an error
    pub fn from_id(id: &str) -> Category {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.id() == id)
            .unwrap_or(Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Keyword lists per category, in declaration order. "other" is the
/// catch-all and carries no keywords.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Work,
        &[
            "meeting",
            "presentation",
            "report",
            "client",
            "project",
            "deadline",
            "boss",
            "email",
            "office",
        ],
    ),
    (
        Category::Personal,
        &[
            "gym", "workout", "exercise", "hobby", "read", "book", "movie", "show", "watch",
            "call", "friend",
        ],
    ),
    (
        Category::Shopping,
        &[
            "buy",
            "purchase",
            "shop",
            "store",
            "grocery",
            "groceries",
            "mall",
            "online",
            "order",
            "amazon",
        ],
    ),
    (
        Category::Health,
        &[
            "doctor",
            "appointment",
            "medicine",
            "pill",
            "vitamin",
            "dentist",
            "workout",
            "run",
            "jog",
            "exercise",
        ],
    ),
    (
        Category::Home,
        &[
            "clean", "laundry", "dishes", "repair", "fix", "garden", "cook", "vacuum", "mow",
            "lawn",
        ],
    ),
    (
        Category::Education,
        &[
            "study",
            "homework",
            "assignment",
            "exam",
            "test",
            "class",
            "lecture",
            "course",
            "learn",
            "read",
            "book",
        ],
    ),
    (
        Category::Travel,
        &[
            "trip",
            "vacation",
            "flight",
            "hotel",
            "booking",
            "passport",
            "pack",
            "suitcase",
            "reservation",
        ],
    ),
    (
        Category::Finance,
        &[
            "bank",
            "pay",
            "bill",
            "tax",
            "investment",
            "money",
            "budget",
            "expense",
            "save",
            "loan",
            "credit",
        ],
    ),
    (
        Category::Social,
        &[
            "friend",
            "party",
            "celebration",
            "dinner",
            "lunch",
            "meet",
            "date",
            "gathering",
            "birthday",
        ],
    ),
    (Category::Other, &[]),
];

/// Keyword-based category and tag classifier
pub struct Classifier {
    // One compiled regex per keyword, built once
    scorers: Vec<(Category, Vec<Regex>)>,
}

impl Classifier {
    pub fn new() -> Self {
        let scorers = CATEGORY_KEYWORDS
            .iter()
            .filter(|(category, _)| *category != Category::Other)
            .map(|(category, keywords)| {
                let regexes = keywords
                    .iter()
                    .filter_map(|kw| Regex::new(&format!("(?i){}", regex::escape(kw))).ok())
                    .collect();
                (*category, regexes)
            })
            .collect();

        Self { scorers }
    }

    /// Best-fit category for a piece of text
    ///
    /// Each keyword occurrence is worth 2 points. The first-declared
    /// category with the highest nonzero score wins; all-zero means "other".
    pub fn categorize(&self, text: &str) -> Category {
        let mut best = (Category::Other, 0usize);

        for (category, regexes) in &self.scorers {
            let score: usize = regexes
                .iter()
                .map(|regex| regex.find_iter(text).count() * 2)
                .sum();

            // Strict comparison keeps the first-declared category on ties
            if score > best.1 {
                best = (*category, score);
            }
        }

        best.0
    }

    /// Category of a task: the stored one when present, classified from
    /// title + description otherwise
    pub fn category_of(&self, task: &Task) -> Category {
        match task.category.as_deref() {
            Some(id) => Category::from_id(id),
            None => self.categorize(&task.text()),
        }
    }

    /// Suggest tags: every keyword contained in the text, in declaration
    /// order, capped at five
    pub fn suggest_tags(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut tags: Vec<String> = Vec::new();

        for (_, keywords) in CATEGORY_KEYWORDS {
            for keyword in *keywords {
                if lower.contains(keyword) && !tags.iter().any(|t| t == keyword) {
                    tags.push((*keyword).to_string());
                    if tags.len() == MAX_SUGGESTED_TAGS {
                        return tags;
                    }
                }
            }
        }

        tags
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
