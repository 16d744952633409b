//! Sticky note model.

use super::entity::{
    require_text, resolve_entity_id, resolve_timestamp, Entity, EntityKind, ValidationError,
};
use super::palette::{resolve_color, Swatch};
use super::task::normalize_tag_refs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    /// May be empty.
    #[serde(default)]
    pub content: String,
    pub color: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, swatch: Swatch) -> Self {
        self.color = Some(swatch.hex().to_string());
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
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

impl Note {
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.contains(tag_id)
    }
}

impl Entity for Note {
    const KIND: EntityKind = EntityKind::Note;

    type Draft = NoteDraft;
    type Patch = NotePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn from_draft(draft: NoteDraft) -> Result<Self, ValidationError> {
        Ok(Self {
            title: require_text(EntityKind::Note, "title", &draft.title)?,
            id: resolve_entity_id(EntityKind::Note, draft.id.as_deref())?,
            content: draft.content.unwrap_or_default(),
            color: resolve_color(draft.color.as_deref(), Swatch::Yellow)?,
            created_at: resolve_timestamp(draft.created_at.as_deref())?,
            tags: normalize_tag_refs(draft.tags)?,
        })
    }

    fn apply_patch(&mut self, patch: &NotePatch) -> Result<(), ValidationError> {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = require_text(EntityKind::Note, "title", title)?;
        }
        if let Some(content) = &patch.content {
            next.content = content.clone();
        }
        if let Some(color) = &patch.color {
            next.color = resolve_color(Some(color), Swatch::Yellow)?;
        }
        if let Some(tags) = &patch.tags {
            next.tags = normalize_tag_refs(tags.clone())?;
        }

        *self = next;
        Ok(())
    }
}
