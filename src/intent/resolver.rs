// Keyword-rule intent resolution
//
// Everything here is first-match-wins over ordered rule tables. The order
// is the contract: "add a reminder" hits the create rule before the remind
// rule ever gets a look.

use crate::intent::model::{Details, EntityType, Intent, IntentKind, Priority};
use chrono::{Datelike, Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Create,
    Update,
    Delete,
    Search,
}

/// Action keyword rules, tested in order; the first group with any hit wins
const ACTION_RULES: &[(&[&str], Action)] = &[
    (&["add", "create", "new"], Action::Create),
    (&["delete", "remove"], Action::Delete),
    (&["edit", "update", "change"], Action::Update),
    (&["find", "show", "list", "get"], Action::Search),
];

/// Entity keyword rules, tested in order; default is task
const ENTITY_RULES: &[(&[&str], EntityType)] = &[
    (&["task"], EntityType::Task),
    (&["note"], EntityType::Note),
    (&["reminder"], EntityType::Reminder),
    (&["event", "meeting", "appointment"], EntityType::Event),
];

/// Priority phrases, tested in order
const PRIORITY_RULES: &[(&[&str], Priority)] = &[
    (&["high priority", "important"], Priority::High),
    (&["medium priority"], Priority::Medium),
    (&["low priority"], Priority::Low),
];

/// Relative date keywords and their day offsets, tested in order
const RELATIVE_DATES: &[(&str, i64)] = &[
    ("today", 0),
    ("tomorrow", 1),
    ("next week", 7),
    ("next month", 30),
];

/// Weekday names, indexed Sunday = 0 to match calendar convention
const WEEKDAYS: &[&str] = &[
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Prepositions that introduce the title/content portion of a command
const TITLE_PREPOSITIONS: &[&str] = &["to", "about", "for", "with", "on"];

/// Resolve a free-text command into a structured intent.
///
/// Never fails: malformed or empty input yields the default search-for-tasks
/// intent. `today` anchors the relative-date keywords.
pub fn resolve(command: &str, today: NaiveDate) -> Intent {
    let command = command.to_lowercase();

    // "remind" only becomes the action when no ordinary action keyword is
    // present, and it pins the entity to reminder
    let mut forced_entity = None;
    let action = match matched_action(&command) {
        Some(action) => action,
        None if command.contains("remind") => {
            forced_entity = Some(EntityType::Reminder);
            Action::Create
        }
        None => Action::Search,
    };

    let entity = forced_entity.unwrap_or_else(|| matched_entity(&command));

    let mut details = Details {
        title: None,
        priority: matched_priority(&command),
        date: relative_date(&command, today).or_else(|| weekday_date(&command, today)),
    };

    if matches!(action, Action::Create | Action::Update) {
        details.title = extract_title(&command, entity);
    }

    let kind = match action {
        Action::Create => IntentKind::Create { entity, details },
        Action::Update => IntentKind::Update { entity, details },
        Action::Delete => IntentKind::Delete { entity, details },
        Action::Search => IntentKind::Search {
            entity,
            terms: command.clone(),
            details,
        },
    };

    Intent {
        kind,
        original: command,
    }
}

fn matched_action(command: &str) -> Option<Action> {
    ACTION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| command.contains(k)))
        .map(|(_, action)| *action)
}

fn matched_entity(command: &str) -> EntityType {
    ENTITY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| command.contains(k)))
        .map(|(_, entity)| *entity)
        .unwrap_or(EntityType::Task)
}

fn matched_priority(command: &str) -> Option<Priority> {
    PRIORITY_RULES
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| command.contains(p)))
        .map(|(_, priority)| *priority)
}

fn relative_date(command: &str, today: NaiveDate) -> Option<NaiveDate> {
    RELATIVE_DATES
        .iter()
        .find(|(keyword, _)| command.contains(keyword))
        .map(|(_, days)| today + Duration::days(*days))
}

/// Next occurrence of a named weekday, where naming today's weekday means
/// next week's occurrence
fn weekday_date(command: &str, today: NaiveDate) -> Option<NaiveDate> {
    let target = WEEKDAYS
        .iter()
        .position(|name| command.contains(name))? as i64;

    let current = today.weekday().num_days_from_sunday() as i64;
    let mut days_ahead = target - current;
    if days_ahead <= 0 {
        days_ahead += 7;
    }

    Some(today + Duration::days(days_ahead))
}

/// Title is whatever follows the earliest space-delimited preposition; when
/// no preposition appears, whatever follows the entity word
fn extract_title(command: &str, entity: EntityType) -> Option<String> {
    let mut best: Option<(usize, usize)> = None; // (match position, content start)

    for prep in TITLE_PREPOSITIONS {
        let needle = format!(" {} ", prep);
        if let Some(idx) = command.find(&needle) {
            if best.map_or(true, |(pos, _)| idx < pos) {
                best = Some((idx, idx + needle.len()));
            }
        }
    }

    let title = match best {
        Some((_, start)) => command[start..].trim().to_string(),
        None => {
            let word = entity.keyword();
            let idx = command.find(word)?;
            command[idx + word.len()..].trim().to_string()
        }
    };

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-06-04 is a Wednesday
    fn today() -> NaiveDate {
        day(2025, 6, 4)
    }

    #[test]
    fn test_no_action_keyword_defaults_to_search() {
        let intent = resolve("groceries for the weekend", today());

        match intent.kind {
            IntentKind::Search { entity, terms, .. } => {
                assert_eq!(entity, EntityType::Task);
                assert_eq!(terms, "groceries for the weekend");
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_yields_default_intent() {
        let intent = resolve("", today());

        assert_eq!(intent.kind.action(), "search");
        assert_eq!(intent.kind.entity(), EntityType::Task);
        assert_eq!(intent.kind.details().title, None);
        assert_eq!(intent.kind.details().date, None);
    }

    #[test]
    fn test_action_priority_order() {
        // "add" and "remove" both present; create is tested first
        let intent = resolve("add task, remove the old one", today());
        assert_eq!(intent.kind.action(), "create");

        let intent = resolve("remove the task", today());
        assert_eq!(intent.kind.action(), "delete");

        let intent = resolve("change the task", today());
        assert_eq!(intent.kind.action(), "update");

        let intent = resolve("show all tasks", today());
        assert_eq!(intent.kind.action(), "search");
    }

    #[test]
    fn test_add_beats_remind_but_entity_scan_still_sees_reminder() {
        let intent = resolve("add a reminder to call mom", today());

        match intent.kind {
            IntentKind::Create { entity, details } => {
                assert_eq!(entity, EntityType::Reminder);
                assert_eq!(details.title.as_deref(), Some("call mom"));
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_remind_alone_forces_reminder_entity() {
        let intent = resolve("remind me to call mom", today());

        match intent.kind {
            IntentKind::Create { entity, details } => {
                assert_eq!(entity, EntityType::Reminder);
                assert_eq!(details.title.as_deref(), Some("call mom"));
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_entity_detection_and_default() {
        assert_eq!(
            resolve("create a note about dinner", today()).kind.entity(),
            EntityType::Note
        );
        assert_eq!(
            resolve("add meeting with the team", today()).kind.entity(),
            EntityType::Event
        );
        assert_eq!(
            resolve("new appointment for monday", today()).kind.entity(),
            EntityType::Event
        );
        // No entity word at all
        assert_eq!(
            resolve("add something", today()).kind.entity(),
            EntityType::Task
        );
    }

    #[test]
    fn test_priority_extraction() {
        let intent = resolve("add important task to file taxes", today());
        assert_eq!(intent.kind.details().priority, Some(Priority::High));

        let intent = resolve("add low priority task to sort photos", today());
        assert_eq!(intent.kind.details().priority, Some(Priority::Low));

        let intent = resolve("add task to sort photos", today());
        assert_eq!(intent.kind.details().priority, None);
    }

    #[test]
    fn test_tomorrow_date() {
        let intent = resolve("add task to water plants tomorrow", today());
        assert_eq!(intent.kind.details().date, Some(day(2025, 6, 5)));
    }

    #[test]
    fn test_relative_date_order_first_match_wins() {
        // "today" is tested before "next week"
        let intent = resolve("show tasks for today and next week", today());
        assert_eq!(intent.kind.details().date, Some(today()));

        let intent = resolve("add task for next month", today());
        assert_eq!(intent.kind.details().date, Some(day(2025, 7, 4)));
    }

    #[test]
    fn test_weekday_next_occurrence() {
        // Friday is two days after Wednesday
        let intent = resolve("add task for friday", today());
        assert_eq!(intent.kind.details().date, Some(day(2025, 6, 6)));

        // Naming today's weekday means next week
        let intent = resolve("add task for wednesday", today());
        assert_eq!(intent.kind.details().date, Some(day(2025, 6, 11)));

        // A day earlier in the week wraps forward
        let intent = resolve("add task for monday", today());
        assert_eq!(intent.kind.details().date, Some(day(2025, 6, 9)));
    }

    #[test]
    fn test_relative_date_beats_weekday() {
        let intent = resolve("add task for tomorrow not friday", today());
        assert_eq!(intent.kind.details().date, Some(day(2025, 6, 5)));
    }

    #[test]
    fn test_title_after_earliest_preposition() {
        let intent = resolve("add a task to buy milk", today());
        assert_eq!(intent.kind.details().title.as_deref(), Some("buy milk"));

        // " for " occurs before " to "; the earliest match wins
        let intent = resolve("add a note for dinner to remember wine", today());
        assert_eq!(
            intent.kind.details().title.as_deref(),
            Some("dinner to remember wine")
        );
    }

    #[test]
    fn test_title_fallback_after_entity_word() {
        let intent = resolve("add task buy milk", today());
        assert_eq!(intent.kind.details().title.as_deref(), Some("buy milk"));
    }

    #[test]
    fn test_title_unset_when_nothing_follows() {
        // Entity word present but nothing after it
        let intent = resolve("create task", today());
        assert_eq!(intent.kind.details().title, None);

        // Entity resolved through a synonym; the word "event" never appears
        let intent = resolve("add meeting", today());
        assert_eq!(intent.kind.entity(), EntityType::Event);
        assert_eq!(intent.kind.details().title, None);
    }

    #[test]
    fn test_title_only_for_create_and_update() {
        let intent = resolve("delete task buy milk", today());
        assert_eq!(intent.kind.details().title, None);
    }

    #[test]
    fn test_search_terms_are_whole_lowercased_command() {
        let intent = resolve("Show my HIGH PRIORITY tasks", today());

        match intent.kind {
            IntentKind::Search { terms, details, .. } => {
                assert_eq!(terms, "show my high priority tasks");
                assert_eq!(details.priority, Some(Priority::High));
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_original_command_is_lowercased_input() {
        let intent = resolve("Add A Task To Buy Milk", today());
        assert_eq!(intent.original, "add a task to buy milk");
    }
}
