//! Pure view helpers over fetched collections.

use crate::model::entity::parse_calendar_date;
use crate::model::list::List;
use crate::model::note::Note;
use crate::model::tag::Tag;
use crate::model::task::{Task, TaskType};
use crate::sync::counters::Progress;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Text fields a search box matches against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Task {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Searchable for Note {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }
}

impl Searchable for List {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Tag {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

/// Case-insensitive substring search; a blank query matches everything.
pub fn search_items<'a, E: Searchable>(items: &'a [E], query: &str) -> Vec<&'a E> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TaskType),
}

impl TypeFilter {
    /// Parses the `all` / `work` / `personal` filter tabs.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "work" => Some(Self::Only(TaskType::Work)),
            "personal" => Some(Self::Only(TaskType::Personal)),
            _ => None,
        }
    }
}

pub fn filter_tasks_by_type(tasks: &[Task], filter: TypeFilter) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match filter {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => task.kind == kind,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort by date, then by time when both tasks have one.
pub fn sort_tasks_by_date(tasks: &mut [Task], direction: SortDirection) {
    tasks.sort_by(|a, b| {
        let ordering = match a.date.cmp(&b.date) {
            Ordering::Equal => match (&a.time, &b.time) {
                (Some(left), Some(right)) => left.cmp(right),
                _ => Ordering::Equal,
            },
            other => other,
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Buckets tasks by their raw `date`, keys in calendar order.
pub fn group_tasks_by_date(tasks: &[Task]) -> BTreeMap<String, Vec<&Task>> {
    let mut grouped: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        grouped.entry(task.date.clone()).or_default().push(task);
    }
    grouped
}

/// A tag reference resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLabel {
    Known { id: String, name: String },
    /// The referenced tag was deleted.
    Unknown { id: String },
}

impl TagLabel {
    pub fn text(&self) -> &str {
        match self {
            Self::Known { name, .. } => name.as_str(),
            Self::Unknown { .. } => "unknown",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Known { id, .. } | Self::Unknown { id } => id.as_str(),
        }
    }
}

pub fn tag_labels(tag_ids: &BTreeSet<String>, tags: &[Tag]) -> Vec<TagLabel> {
    tag_ids
        .iter()
        .map(|id| match tags.iter().find(|tag| &tag.id == id) {
            Some(tag) => TagLabel::Known {
                id: id.clone(),
                name: tag.name.clone(),
            },
            None => TagLabel::Unknown { id: id.clone() },
        })
        .collect()
}

pub fn today_progress(tasks: &[Task], today: NaiveDate) -> Progress {
    tasks
        .iter()
        .filter(|task| parse_calendar_date(&task.date) == Some(today))
        .fold(Progress::default(), |mut progress, task| {
            progress.total += 1;
            if task.completed {
                progress.completed += 1;
            }
            progress
        })
}
