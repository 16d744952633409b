//! Task model: calendar-scheduled to-do items.
//!
//! # Invariants
//! - `date` is always present and written as `YYYY-MM-DD`.
//! - `tags` and `list_id` are soft references; dangling ids are valid state.
//! - `created_at` never changes after creation.

use super::entity::{
    normalize_date, normalize_reference, normalize_time, require_text, resolve_entity_id,
    resolve_timestamp, Entity, EntityKind, ValidationError,
};
use super::wire;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Task category shown as a colored badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Work,
    #[default]
    Personal,
    /// Any unrecognized wire value. Never written to the store.
    #[serde(other)]
    Unknown,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Self::Work,
            "personal" => Self::Personal,
            _ => Self::Unknown,
        }
    }

    pub fn badge_color(self) -> &'static str {
        match self {
            Self::Work => "#2196F3",
            Self::Personal => "#FF9800",
            Self::Unknown => "#666",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Work => "\u{2699}\u{fe0f}",
            Self::Personal => "\u{1f60a}",
            Self::Unknown => "\u{1f4cc}",
        }
    }

    fn require_known(self) -> Result<Self, ValidationError> {
        match self {
            Self::Unknown => Err(ValidationError::InvalidType),
            known => Ok(known),
        }
    }
}

/// Stored task record in its client-facing (camelCase) shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Kept as text so a malformed value from a transport can be skipped
    /// instead of failing the whole collection.
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub time: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: TaskType,
    #[serde(default, deserialize_with = "wire::flag")]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub list_id: Option<String>,
}

/// Creation payload. Only `title` and `date` are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::blank_as_none"
    )]
    pub time: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::optional_flag"
    )]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::blank_as_none"
    )]
    pub list_id: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: TaskType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_list(mut self, list_id: impl Into<String>) -> Self {
        self.list_id = Some(list_id.into());
        self
    }
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::nullable"
    )]
    pub time: Option<Option<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::optional_flag"
    )]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::nullable"
    )]
    pub list_id: Option<Option<String>>,
}

impl TaskPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }
}

impl Task {
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.contains(tag_id)
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    type Draft = TaskDraft;
    type Patch = TaskPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn from_draft(draft: TaskDraft) -> Result<Self, ValidationError> {
        let title = require_text(EntityKind::Task, "title", &draft.title)?;
        if draft.date.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                kind: EntityKind::Task,
                field: "date",
            });
        }

        Ok(Self {
            id: resolve_entity_id(EntityKind::Task, draft.id.as_deref())?,
            title,
            description: draft.description.unwrap_or_default(),
            date: normalize_date(&draft.date)?,
            time: normalize_time(draft.time.as_deref())?,
            kind: draft.kind.unwrap_or_default().require_known()?,
            completed: draft.completed.unwrap_or(false),
            created_at: resolve_timestamp(draft.created_at.as_deref())?,
            tags: normalize_tag_refs(draft.tags)?,
            list_id: normalize_reference(draft.list_id.as_deref())?,
        })
    }

    fn apply_patch(&mut self, patch: &TaskPatch) -> Result<(), ValidationError> {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = require_text(EntityKind::Task, "title", title)?;
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(date) = &patch.date {
            if date.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    kind: EntityKind::Task,
                    field: "date",
                });
            }
            next.date = normalize_date(date)?;
        }
        if let Some(time) = &patch.time {
            next.time = normalize_time(time.as_deref())?;
        }
        if let Some(kind) = patch.kind {
            next.kind = kind.require_known()?;
        }
        if let Some(completed) = patch.completed {
            next.completed = completed;
        }
        if let Some(tags) = &patch.tags {
            next.tags = normalize_tag_refs(tags.clone())?;
        }
        if let Some(list_id) = &patch.list_id {
            next.list_id = normalize_reference(list_id.as_deref())?;
        }

        *self = next;
        Ok(())
    }

    /// Ascending by date, untimed tasks before timed ones on the same day.
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.created_at.cmp(&b.created_at))
    }
}

/// Trims and validates tag id references, dropping blanks.
pub(crate) fn normalize_tag_refs(tags: BTreeSet<String>) -> Result<BTreeSet<String>, ValidationError> {
    let mut normalized = BTreeSet::new();
    for tag in tags {
        if let Some(id) = normalize_reference(Some(&tag))? {
            normalized.insert(id);
        }
    }
    Ok(normalized)
}
