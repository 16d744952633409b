//! Shared entity vocabulary: kinds, identity, timestamps and validation.
//!
//! # Responsibility
//! - Name the four entity families and their REST collection paths.
//! - Generate and validate opaque ids and `createdAt` stamps.
//! - Provide the [`Entity`] contract every stored type implements.
//!
//! # Invariants
//! - Generated ids are `<kind>_<uuid-v4-simple>` and never reused.
//! - `createdAt` is RFC 3339 UTC with millisecond precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static ENTITY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("valid entity id regex"));

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// The four independent top-level entity families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Note,
    List,
    Tag,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::Task, Self::Note, Self::List, Self::Tag];

    /// Singular lowercase name, also used as the generated id prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Note => "note",
            Self::List => "list",
            Self::Tag => "tag",
        }
    }

    /// REST collection segment (`/api/<collection>`).
    pub fn collection(self) -> &'static str {
        match self {
            Self::Task => "tasks",
            Self::Note => "notes",
            Self::List => "lists",
            Self::Tag => "tags",
        }
    }

    /// Capitalized label used in user-facing notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Note => "Note",
            Self::List => "List",
            Self::Tag => "Tag",
        }
    }

    pub fn from_collection(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.collection() == segment)
    }

    /// Tags are create/delete only on the REST surface.
    pub fn supports_update(self) -> bool {
        !matches!(self, Self::Tag)
    }

    pub fn collection_path(self) -> String {
        format!("/api/{}", self.collection())
    }

    pub fn item_path(self, id: &str) -> String {
        format!("/api/{}/{}", self.collection(), id)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure raised before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField {
        kind: EntityKind,
        field: &'static str,
    },
    InvalidDate(String),
    InvalidTime(String),
    InvalidColor(String),
    InvalidType,
    InvalidId(String),
    InvalidTimestamp(String),
    DuplicateId {
        kind: EntityKind,
        id: String,
    },
    DuplicateTagName(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { kind, field } => write!(f, "{kind} {field} is required"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidTime(value) => write!(f, "invalid time `{value}`; expected HH:MM"),
            Self::InvalidColor(value) => {
                write!(f, "color `{value}` is not one of the palette swatches")
            }
            Self::InvalidType => f.write_str("task type must be `work` or `personal`"),
            Self::InvalidId(value) => write!(
                f,
                "invalid id `{value}`; expected 1-128 characters of [A-Za-z0-9_-]"
            ),
            Self::InvalidTimestamp(value) => {
                write!(f, "invalid createdAt `{value}`; expected RFC 3339")
            }
            Self::DuplicateId { kind, id } => write!(f, "{kind} with id `{id}` already exists"),
            Self::DuplicateTagName(name) => {
                write!(f, "a tag named `{name}` already exists")
            }
        }
    }
}

impl Error for ValidationError {}

/// Contract shared by Task, Note, List and Tag.
///
/// `Draft` is the creation payload (id and `createdAt` optional), `Patch`
/// carries only the fields a partial update wants to change.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    type Draft: Clone + Serialize + DeserializeOwned;
    type Patch: Clone + Serialize + DeserializeOwned;

    fn id(&self) -> &str;

    fn created_at(&self) -> &str;

    /// Factory: stamps id/`createdAt`/defaults and validates required fields.
    fn from_draft(draft: Self::Draft) -> Result<Self, ValidationError>;

    /// Merges supplied fields; absent fields keep their current values.
    fn apply_patch(&mut self, patch: &Self::Patch) -> Result<(), ValidationError>;

    /// Order used by `GET` on the collection. Defaults to newest first.
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.created_at().cmp(a.created_at())
    }
}

/// Generates a fresh id for `kind`.
pub fn new_entity_id(kind: EntityKind) -> String {
    format!("{}_{}", kind.as_str(), Uuid::new_v4().simple())
}

/// Accepts a caller-supplied id or generates one when absent.
pub fn resolve_entity_id(kind: EntityKind, id: Option<&str>) -> Result<String, ValidationError> {
    match id.map(str::trim) {
        None | Some("") => Ok(new_entity_id(kind)),
        Some(value) if ENTITY_ID_RE.is_match(value) => Ok(value.to_string()),
        Some(value) => Err(ValidationError::InvalidId(value.to_string())),
    }
}

/// Current instant as a `createdAt` stamp.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalizes a caller-supplied `createdAt`, or stamps now when absent.
///
/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS` form SQL servers emit
/// (read as UTC).
pub fn resolve_timestamp(value: Option<&str>) -> Result<String, ValidationError> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(now_timestamp());
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| {
            naive
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
        .map_err(|_| ValidationError::InvalidTimestamp(raw.to_string()))
}

/// Parses a `createdAt` stamp, `None` when malformed.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Validates and canonicalizes a `YYYY-MM-DD` calendar date.
pub fn normalize_date(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Lenient calendar-date read used by derived counters.
///
/// Also accepts an ISO datetime by reading its date part; anything else is
/// `None` so callers can skip the record.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| {
            let (date_part, _) = trimmed.split_once('T')?;
            NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
        })
}

/// Validates an optional clock time; blank means "no time".
pub fn normalize_time(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|time| Some(time.format(TIME_FORMAT).to_string()))
        .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
}

/// Trims a required text field, rejecting blank values.
pub fn require_text(
    kind: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { kind, field });
    }
    Ok(trimmed.to_string())
}

/// Validates a soft reference to another entity. Existence is not checked.
pub fn normalize_reference(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) if ENTITY_ID_RE.is_match(id) => Ok(Some(id.to_string())),
        Some(id) => Err(ValidationError::InvalidId(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_kind_prefix() {
        let id = new_entity_id(EntityKind::List);
        assert!(id.starts_with("list_"));
        assert!(ENTITY_ID_RE.is_match(&id));
    }

    #[test]
    fn resolve_entity_id_rejects_path_unsafe_values() {
        assert!(resolve_entity_id(EntityKind::Task, Some("task/../x")).is_err());
        assert_eq!(
            resolve_entity_id(EntityKind::Task, Some("task_1")).unwrap(),
            "task_1"
        );
    }

    #[test]
    fn timestamps_normalize_to_utc_millis() {
        assert_eq!(
            resolve_timestamp(Some("2024-06-10T11:30:00+02:00")).unwrap(),
            "2024-06-10T09:30:00.000Z"
        );
        assert_eq!(
            resolve_timestamp(Some("2024-06-10 09:30:00")).unwrap(),
            "2024-06-10T09:30:00.000Z"
        );
        assert!(resolve_timestamp(Some("yesterday")).is_err());
    }

    #[test]
    fn calendar_date_parsing_is_lenient_only_about_time_suffix() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 10);
        assert_eq!(parse_calendar_date("2024-06-10"), expected);
        assert_eq!(parse_calendar_date("2024-06-10T00:00:00Z"), expected);
        assert_eq!(parse_calendar_date("10/06/2024"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn time_normalization_drops_seconds_and_blank() {
        assert_eq!(normalize_time(Some("09:05:00")).unwrap().as_deref(), Some("09:05"));
        assert_eq!(normalize_time(Some("  ")).unwrap(), None);
        assert!(normalize_time(Some("25:00")).is_err());
    }
}
