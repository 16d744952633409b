//! Derived badge counts and dashboard statistics.
//!
//! # Invariants
//! - Every value here is a pure function of the collections and the date
//!   or instant passed in.
//! - Tasks with a missing or malformed `date` are excluded, never an error.

use crate::model::entity::{parse_calendar_date, parse_timestamp};
use crate::model::list::List;
use crate::model::note::Note;
use crate::model::task::Task;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Source of "today" and "now" for counters.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    fn now(&self) -> DateTime<Utc>;
}

/// Reads the local calendar date, matching what the user sees on screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// Pins `today` to `date` and `now` to midday UTC of that date.
    pub fn on(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(12, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or_else(Utc::now);
        Self { now, today: date }
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            today: now.date_naive(),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Sidebar badge counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// Tasks dated today, completed or not.
    pub today: usize,
    /// Uncompleted tasks dated strictly after today.
    pub upcoming: usize,
}

impl TaskCounts {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        tasks
            .iter()
            .filter_map(|task| parse_calendar_date(&task.date).map(|date| (date, task.completed)))
            .fold(Self::default(), |mut counts, (date, completed)| {
                if date == today {
                    counts.today += 1;
                } else if date > today && !completed {
                    counts.upcoming += 1;
                }
                counts
            })
    }
}

/// Completed vs. total for today's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Rounded percentage, `None` when there is nothing to measure.
    pub fn percent(&self) -> Option<u8> {
        percent_of(self.completed, self.total)
    }
}

/// Headline statistics for the dashboard view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub pending_tasks: usize,
    pub completed_tasks: usize,
    /// Rounded percentage of completed tasks; `None` without tasks.
    pub completion_rate: Option<u8>,
    pub today_pending: usize,
    pub notes: usize,
    pub lists: usize,
    pub notes_last_24h: usize,
}

impl DashboardSummary {
    pub fn compute(
        tasks: &[Task],
        notes: &[Note],
        lists: &[List],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        let completed_tasks = tasks.iter().filter(|task| task.completed).count();
        let today_pending = tasks
            .iter()
            .filter(|task| !task.completed && parse_calendar_date(&task.date) == Some(today))
            .count();
        let since = now - Duration::hours(24);
        let notes_last_24h = notes
            .iter()
            .filter_map(|note| parse_timestamp(&note.created_at))
            .filter(|created| *created > since && *created <= now)
            .count();

        Self {
            pending_tasks: tasks.len() - completed_tasks,
            completed_tasks,
            completion_rate: percent_of(completed_tasks, tasks.len()),
            today_pending,
            notes: notes.len(),
            lists: lists.len(),
            notes_last_24h,
        }
    }
}

fn percent_of(part: usize, total: usize) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let rounded = ((part as f64 / total as f64) * 100.0).round();
    Some(rounded.clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskType;
    use std::collections::BTreeSet;

    fn task(id: &str, date: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            date: date.to_string(),
            time: None,
            kind: TaskType::Personal,
            completed,
            created_at: "2024-06-01T08:00:00.000Z".to_string(),
            tags: BTreeSet::new(),
            list_id: None,
        }
    }

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn counts_today_and_upcoming() {
        let tasks = vec![
            task("a", "2024-06-10", false),
            task("b", "2024-06-11", false),
            task("c", "2024-06-09", true),
        ];
        let counts = TaskCounts::compute(&tasks, day("2024-06-10"));
        assert_eq!(counts, TaskCounts { today: 1, upcoming: 1 });
    }

    #[test]
    fn completed_tasks_count_today_but_not_upcoming() {
        let tasks = vec![
            task("a", "2024-06-10", true),
            task("b", "2024-07-01", true),
        ];
        let counts = TaskCounts::compute(&tasks, day("2024-06-10"));
        assert_eq!(counts, TaskCounts { today: 1, upcoming: 0 });
    }

    #[test]
    fn malformed_dates_are_skipped() {
        let tasks = vec![
            task("a", "", false),
            task("b", "tomorrow", false),
            task("c", "2024-13-40", false),
            task("d", "2024-06-12T00:00:00.000Z", false),
        ];
        let counts = TaskCounts::compute(&tasks, day("2024-06-10"));
        assert_eq!(counts, TaskCounts { today: 0, upcoming: 1 });
    }

    #[test]
    fn dashboard_summary_rates_and_recent_notes() {
        let tasks = vec![
            task("a", "2024-06-10", true),
            task("b", "2024-06-10", false),
            task("c", "2024-06-11", false),
        ];
        let recent = Note {
            id: "note_1".to_string(),
            title: "Recent".to_string(),
            content: String::new(),
            color: "#FFEB3B".to_string(),
            created_at: "2024-06-10T06:00:00.000Z".to_string(),
            tags: BTreeSet::new(),
        };
        let mut old = recent.clone();
        old.id = "note_2".to_string();
        old.created_at = "2024-06-01T06:00:00.000Z".to_string();

        let clock = FixedClock::on(day("2024-06-10"));
        let summary =
            DashboardSummary::compute(&tasks, &[recent, old], &[], clock.today(), clock.now());
        assert_eq!(summary.pending_tasks, 2);
        assert_eq!(summary.completed_tasks, 1);
        assert_eq!(summary.completion_rate, Some(33));
        assert_eq!(summary.today_pending, 1);
        assert_eq!(summary.notes, 2);
        assert_eq!(summary.notes_last_24h, 1);
    }

    #[test]
    fn empty_collections_have_no_completion_rate() {
        let summary = DashboardSummary::compute(&[], &[], &[], day("2024-06-10"), Utc::now());
        assert_eq!(summary.completion_rate, None);
        assert_eq!(Progress::default().percent(), None);
    }
}
