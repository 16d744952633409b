//! Note persistence.

use super::tag_links::NOTE_TAGS;
use super::{ensure_new_id, not_found, RepoError, RepoResult, Repository};
use crate::model::entity::{Entity, EntityKind};
use crate::model::note::{Note, NoteDraft, NotePatch};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

const NOTE_SELECT_SQL: &str = "SELECT id, title, content, color, created_at FROM notes";

pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Repository<Note> for SqliteNoteRepository<'_> {
    fn create(&self, draft: NoteDraft) -> RepoResult<Note> {
        let note = Note::from_draft(draft)?;

        let tx = self.conn.unchecked_transaction()?;
        ensure_new_id(&tx, "notes", EntityKind::Note, &note.id)?;
        tx.execute(
            "INSERT INTO notes (id, title, content, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![note.id, note.title, note.content, note.color, note.created_at],
        )?;
        NOTE_TAGS.replace(&tx, &note.id, &note.tags)?;
        let stored = fetch_note(&tx, &note.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("note `{}` missing after insert", note.id))
        })?;
        tx.commit()?;

        debug!(
            "event=store_write module=store status=ok op=create kind=note id={}",
            stored.id
        );
        Ok(stored)
    }

    fn get(&self, id: &str) -> RepoResult<Option<Note>> {
        fetch_note(self.conn, id)
    }

    fn update(&self, id: &str, patch: &NotePatch) -> RepoResult<Note> {
        let tx = self.conn.unchecked_transaction()?;
        let mut note = fetch_note(&tx, id)?.ok_or_else(|| not_found(EntityKind::Note, id))?;
        note.apply_patch(patch)?;

        tx.execute(
            "UPDATE notes SET title = ?2, content = ?3, color = ?4 WHERE id = ?1;",
            params![note.id, note.title, note.content, note.color],
        )?;
        if patch.tags.is_some() {
            NOTE_TAGS.replace(&tx, &note.id, &note.tags)?;
        }
        tx.commit()?;

        debug!("event=store_write module=store status=ok op=update kind=note id={id}");
        Ok(note)
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let removed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        debug!(
            "event=store_write module=store status=ok op=delete kind=note id={id} existed={}",
            removed > 0
        );
        Ok(removed > 0)
    }

    fn list(&self) -> RepoResult<Vec<Note>> {
        let mut links = NOTE_TAGS.load_all(self.conn)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let mut note = parse_note_row(row)?;
            note.tags = links.remove(&note.id).unwrap_or_default();
            notes.push(note);
        }
        Ok(notes)
    }
}

fn fetch_note(conn: &Connection, id: &str) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut note = parse_note_row(row)?;
    note.tags = NOTE_TAGS.load(conn, id)?;
    Ok(Some(note))
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        tags: BTreeSet::new(),
    })
}
