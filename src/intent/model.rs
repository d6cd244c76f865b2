/// Intent data model
///
/// An intent is keyed by its action so that action-specific fields (search
/// terms) only exist where they are meaningful. Absence of signal in the
/// command always falls back to a default variant, never to an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of record an intent targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Task,
    Note,
    Reminder,
    Event,
}

impl EntityType {
    /// The word users type to name this entity; also used for the
    /// title-extraction fallback
    pub fn keyword(&self) -> &'static str {
        match self {
            EntityType::Task => "task",
            EntityType::Note => "note",
            EntityType::Reminder => "reminder",
            EntityType::Event => "event",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Task priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional fields extracted from the command text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub date: Option<NaiveDate>,
}

/// Intent variants keyed by action
///
/// Search carries its terms inline so a search intent can never exist
/// without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum IntentKind {
    Create { entity: EntityType, details: Details },
    Update { entity: EntityType, details: Details },
    Delete { entity: EntityType, details: Details },
    Search { entity: EntityType, terms: String, details: Details },
}

impl IntentKind {
    pub fn action(&self) -> &'static str {
        match self {
            IntentKind::Create { .. } => "create",
            IntentKind::Update { .. } => "update",
            IntentKind::Delete { .. } => "delete",
            IntentKind::Search { .. } => "search",
        }
    }

    pub fn entity(&self) -> EntityType {
        match self {
            IntentKind::Create { entity, .. }
            | IntentKind::Update { entity, .. }
            | IntentKind::Delete { entity, .. }
            | IntentKind::Search { entity, .. } => *entity,
        }
    }

    pub fn details(&self) -> &Details {
        match self {
            IntentKind::Create { details, .. }
            | IntentKind::Update { details, .. }
            | IntentKind::Delete { details, .. }
            | IntentKind::Search { details, .. } => details,
        }
    }
}

/// A resolved command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(flatten)]
    pub kind: IntentKind,
    /// Lowercased raw input, retained for traceability
    pub original: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serializes_with_action_tag() {
        let intent = Intent {
            kind: IntentKind::Search {
                entity: EntityType::Task,
                terms: "show tasks".to_string(),
                details: Details::default(),
            },
            original: "show tasks".to_string(),
        };

        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["action"], "search");
        assert_eq!(json["entity"], "task");
        assert_eq!(json["terms"], "show tasks");
    }

    #[test]
    fn test_kind_accessors() {
        let kind = IntentKind::Create {
            entity: EntityType::Reminder,
            details: Details {
                priority: Some(Priority::High),
                ..Default::default()
            },
        };

        assert_eq!(kind.action(), "create");
        assert_eq!(kind.entity(), EntityType::Reminder);
        assert_eq!(kind.details().priority, Some(Priority::High));
    }
}
