//! List persistence.
//!
//! `task_ids` is never stored: it is read from `tasks.list_id` so the task
//! side stays the single owner of membership.

use super::{ensure_new_id, not_found, RepoError, RepoResult, Repository};
use crate::model::entity::{Entity, EntityKind};
use crate::model::list::{List, ListDraft, ListPatch};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;

const LIST_SELECT_SQL: &str = "SELECT id, name, color, created_at FROM lists";

pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Repository<List> for SqliteListRepository<'_> {
    fn create(&self, draft: ListDraft) -> RepoResult<List> {
        let list = List::from_draft(draft)?;

        let tx = self.conn.unchecked_transaction()?;
        ensure_new_id(&tx, "lists", EntityKind::List, &list.id)?;
        tx.execute(
            "INSERT INTO lists (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![list.id, list.name, list.color, list.created_at],
        )?;
        // A client may reuse the id of a deleted list that tasks still point at.
        let stored = fetch_list(&tx, &list.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("list `{}` missing after insert", list.id))
        })?;
        tx.commit()?;

        debug!(
            "event=store_write module=store status=ok op=create kind=list id={}",
            stored.id
        );
        Ok(stored)
    }

    fn get(&self, id: &str) -> RepoResult<Option<List>> {
        fetch_list(self.conn, id)
    }

    fn update(&self, id: &str, patch: &ListPatch) -> RepoResult<List> {
        let tx = self.conn.unchecked_transaction()?;
        let mut list = fetch_list(&tx, id)?.ok_or_else(|| not_found(EntityKind::List, id))?;
        list.apply_patch(patch)?;
        tx.execute(
            "UPDATE lists SET name = ?2, color = ?3 WHERE id = ?1;",
            params![list.id, list.name, list.color],
        )?;
        tx.commit()?;

        debug!("event=store_write module=store status=ok op=update kind=list id={id}");
        Ok(list)
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let removed = self.conn.execute("DELETE FROM lists WHERE id = ?1;", [id])?;
        debug!(
            "event=store_write module=store status=ok op=delete kind=list id={id} existed={}",
            removed > 0
        );
        Ok(removed > 0)
    }

    fn list(&self) -> RepoResult<Vec<List>> {
        let mut members = load_all_members(self.conn)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            let mut list = parse_list_row(row)?;
            list.task_ids = members.remove(&list.id).unwrap_or_default();
            lists.push(list);
        }
        Ok(lists)
    }
}

fn fetch_list(conn: &Connection, id: &str) -> RepoResult<Option<List>> {
    let mut stmt = conn.prepare(&format!("{LIST_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut list = parse_list_row(row)?;
    list.task_ids = load_members(conn, id)?;
    Ok(Some(list))
}

fn load_members(conn: &Connection, list_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT id FROM tasks WHERE list_id = ?1 ORDER BY rowid ASC;")?;
    let mut rows = stmt.query([list_id])?;
    let mut task_ids = Vec::new();
    while let Some(row) = rows.next()? {
        task_ids.push(row.get(0)?);
    }
    Ok(task_ids)
}

fn load_all_members(conn: &Connection) -> RepoResult<HashMap<String, Vec<String>>> {
    let mut stmt = conn.prepare(
        "SELECT list_id, id FROM tasks WHERE list_id IS NOT NULL ORDER BY rowid ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut members: HashMap<String, Vec<String>> = HashMap::new();
    while let Some(row) = rows.next()? {
        members.entry(row.get(0)?).or_default().push(row.get(1)?);
    }
    Ok(members)
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<List> {
    Ok(List {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        task_ids: Vec::new(),
    })
}
