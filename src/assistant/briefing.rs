// Morning briefing
//
// A one-shot summary of the day: high-priority tasks and scheduled events.
// Pure text assembly over the task collection.

use crate::db::Task;
use chrono::NaiveDate;

/// Build the morning briefing for the given date.
pub fn morning_summary(tasks: &[Task], today: NaiveDate) -> String {
    let todays: Vec<&Task> = tasks.iter().filter(|t| t.due() == Some(today)).collect();

    let priority: Vec<&&Task> = todays.iter().filter(|t| t.priority == "high").collect();
    let meetings: Vec<&&Task> = todays.iter().filter(|t| t.is_event).collect();

    let mut summary = String::from("Good morning! Here's your day:\n");

    if !priority.is_empty() {
        summary.push_str("\nPriority tasks:\n");
        for task in &priority {
            summary.push_str(&format!("- {}\n", task.title));
        }
    }

    if !meetings.is_empty() {
        summary.push_str("\nToday's meetings:\n");
        for meeting in &meetings {
            match meeting.due_time.as_deref() {
                Some(time) if !time.is_empty() => {
                    summary.push_str(&format!("- {} at {}\n", meeting.title, time))
                }
                _ => summary.push_str(&format!("- {}\n", meeting.title)),
            }
        }
    }

    if priority.is_empty() && meetings.is_empty() {
        summary.push_str("\nNothing urgent on the schedule.\n");
    }

    summary.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task_on(id: &str, title: &str, due: &str) -> Task {
        let mut t = Task::new(id, title);
        t.due_date = Some(due.to_string());
        t
    }

    #[test]
    fn test_briefing_lists_priority_tasks_and_meetings() {
        let mut report = task_on("1", "file the report", "2025-06-04");
        report.priority = "high".to_string();

        let mut standup = task_on("2", "team standup", "2025-06-04");
        standup.is_event = true;
        standup.due_time = Some("09:00".to_string());

        let ordinary = task_on("3", "water plants", "2025-06-04");
        let elsewhere = task_on("4", "pay rent", "2025-07-01");

        let summary = morning_summary(
            &[report, standup, ordinary, elsewhere],
            day(2025, 6, 4),
        );

        assert!(summary.starts_with("Good morning! Here's your day:"));
        assert!(summary.contains("- file the report"));
        assert!(summary.contains("- team standup at 09:00"));
        assert!(!summary.contains("water plants"));
        assert!(!summary.contains("pay rent"));
    }

    #[test]
    fn test_briefing_quiet_day() {
        let summary = morning_summary(&[], day(2025, 6, 4));
        assert!(summary.contains("Nothing urgent on the schedule."));
    }
}
