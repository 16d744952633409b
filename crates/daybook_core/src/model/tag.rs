//! Globally shared tag label, referenced by id from tasks and notes.

use super::entity::{
    require_text, resolve_entity_id, resolve_timestamp, Entity, EntityKind, ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl TagDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Rename payload. Only reachable through the store; the REST surface has
/// no tag update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Entity for Tag {
    const KIND: EntityKind = EntityKind::Tag;

    type Draft = TagDraft;
    type Patch = TagPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn from_draft(draft: TagDraft) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text(EntityKind::Tag, "name", &draft.name)?,
            id: resolve_entity_id(EntityKind::Tag, draft.id.as_deref())?,
            created_at: resolve_timestamp(draft.created_at.as_deref())?,
        })
    }

    fn apply_patch(&mut self, patch: &TagPatch) -> Result<(), ValidationError> {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = require_text(EntityKind::Tag, "name", name)?;
        }

        *self = next;
        Ok(())
    }
}
