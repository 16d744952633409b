//! Tag persistence.
//!
//! Tag names are unique case-insensitively. Deleting a tag leaves
//! `task_tags`/`note_tags` rows untouched.

use super::{ensure_new_id, not_found, RepoResult, Repository};
use crate::model::entity::{Entity, EntityKind, ValidationError};
use crate::model::tag::{Tag, TagDraft, TagPatch};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TAG_SELECT_SQL: &str = "SELECT id, name, created_at FROM tags";

pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                &format!("{TAG_SELECT_SQL} WHERE name = ?1 COLLATE NOCASE LIMIT 1;"),
                [name.trim()],
                parse_tag_row,
            )
            .optional()?;
        Ok(tag)
    }
}

impl Repository<Tag> for SqliteTagRepository<'_> {
    fn create(&self, draft: TagDraft) -> RepoResult<Tag> {
        let tag = Tag::from_draft(draft)?;

        let tx = self.conn.unchecked_transaction()?;
        ensure_new_id(&tx, "tags", EntityKind::Tag, &tag.id)?;
        ensure_unique_name(&tx, &tag.name, None)?;
        tx.execute(
            "INSERT INTO tags (id, name, created_at) VALUES (?1, ?2, ?3);",
            params![tag.id, tag.name, tag.created_at],
        )?;
        tx.commit()?;

        debug!(
            "event=store_write module=store status=ok op=create kind=tag id={}",
            tag.id
        );
        Ok(tag)
    }

    fn get(&self, id: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                &format!("{TAG_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_tag_row,
            )
            .optional()?;
        Ok(tag)
    }

    fn update(&self, id: &str, patch: &TagPatch) -> RepoResult<Tag> {
        let tx = self.conn.unchecked_transaction()?;
        let mut tag = tx
            .query_row(
                &format!("{TAG_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_tag_row,
            )
            .optional()?
            .ok_or_else(|| not_found(EntityKind::Tag, id))?;
        tag.apply_patch(patch)?;
        ensure_unique_name(&tx, &tag.name, Some(id))?;
        tx.execute(
            "UPDATE tags SET name = ?2 WHERE id = ?1;",
            params![tag.id, tag.name],
        )?;
        tx.commit()?;

        debug!("event=store_write module=store status=ok op=update kind=tag id={id}");
        Ok(tag)
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let removed = self.conn.execute("DELETE FROM tags WHERE id = ?1;", [id])?;
        debug!(
            "event=store_write module=store status=ok op=delete kind=tag id={id} existed={}",
            removed > 0
        );
        Ok(removed > 0)
    }

    fn list(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TAG_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let tags = stmt
            .query_map([], parse_tag_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}

fn ensure_unique_name(conn: &Connection, name: &str, except_id: Option<&str>) -> RepoResult<()> {
    let taken: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM tags
            WHERE name = ?1 COLLATE NOCASE
              AND (?2 IS NULL OR id <> ?2)
        );",
        params![name, except_id],
        |row| row.get(0),
    )?;
    if taken == 1 {
        return Err(ValidationError::DuplicateTagName(name.to_string()).into());
    }
    Ok(())
}

fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
