//! Named task list.
//!
//! Membership is owned by tasks (`Task::list_id`); `task_ids` is derived by
//! the store on every read and ignored on write.

use super::entity::{
    require_text, resolve_entity_id, resolve_timestamp, Entity, EntityKind, ValidationError,
};
use super::palette::{resolve_color, Swatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub created_at: String,
    /// Ids of tasks whose `listId` points here, in task creation order.
    #[serde(default)]
    pub task_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ListDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, swatch: Swatch) -> Self {
        self.color = Some(swatch.hex().to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl List {
    pub fn contains_task(&self, task_id: &str) -> bool {
        self.task_ids.iter().any(|id| id == task_id)
    }
}

impl Entity for List {
    const KIND: EntityKind = EntityKind::List;

    type Draft = ListDraft;
    type Patch = ListPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn from_draft(draft: ListDraft) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text(EntityKind::List, "name", &draft.name)?,
            id: resolve_entity_id(EntityKind::List, draft.id.as_deref())?,
            color: resolve_color(draft.color.as_deref(), Swatch::Green)?,
            created_at: resolve_timestamp(draft.created_at.as_deref())?,
            task_ids: Vec::new(),
        })
    }

    fn apply_patch(&mut self, patch: &ListPatch) -> Result<(), ValidationError> {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = require_text(EntityKind::List, "name", name)?;
        }
        if let Some(color) = &patch.color {
            next.color = resolve_color(Some(color), Swatch::Green)?;
        }

        *self = next;
        Ok(())
    }
}
