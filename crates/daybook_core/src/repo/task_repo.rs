//! Task persistence.

use super::tag_links::TASK_TAGS;
use super::{ensure_new_id, not_found, RepoError, RepoResult, Repository};
use crate::model::entity::{Entity, EntityKind};
use crate::model::task::{Task, TaskDraft, TaskPatch, TaskType};
use log::{debug, info};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    date,
    time,
    type,
    completed,
    created_at,
    list_id
FROM tasks";

/// SQLite-backed task store.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Removes every task (and its tag links). Returns the number removed.
    pub fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM tasks;", [])?;
        info!("event=store_purge module=store status=ok kind=task removed={removed}");
        Ok(removed)
    }
}

impl Repository<Task> for SqliteTaskRepository<'_> {
    fn create(&self, draft: TaskDraft) -> RepoResult<Task> {
        let task = Task::from_draft(draft)?;

        let tx = self.conn.unchecked_transaction()?;
        ensure_new_id(&tx, "tasks", EntityKind::Task, &task.id)?;
        tx.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                date,
                time,
                type,
                completed,
                created_at,
                list_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                task.id,
                task.title,
                task.description,
                task.date,
                task.time,
                task.kind.as_str(),
                bool_to_int(task.completed),
                task.created_at,
                task.list_id,
            ],
        )?;
        TASK_TAGS.replace(&tx, &task.id, &task.tags)?;
        let stored = fetch_task(&tx, &task.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("task `{}` missing after insert", task.id))
        })?;
        tx.commit()?;

        debug!(
            "event=store_write module=store status=ok op=create kind=task id={}",
            stored.id
        );
        Ok(stored)
    }

    fn get(&self, id: &str) -> RepoResult<Option<Task>> {
        fetch_task(self.conn, id)
    }

    fn update(&self, id: &str, patch: &TaskPatch) -> RepoResult<Task> {
        let tx = self.conn.unchecked_transaction()?;
        let mut task = fetch_task(&tx, id)?.ok_or_else(|| not_found(EntityKind::Task, id))?;
        task.apply_patch(patch)?;

        tx.execute(
            "UPDATE tasks
             SET
                title = ?2,
                description = ?3,
                date = ?4,
                time = ?5,
                type = ?6,
                completed = ?7,
                list_id = ?8
             WHERE id = ?1;",
            params![
                task.id,
                task.title,
                task.description,
                task.date,
                task.time,
                task.kind.as_str(),
                bool_to_int(task.completed),
                task.list_id,
            ],
        )?;
        if patch.tags.is_some() {
            TASK_TAGS.replace(&tx, &task.id, &task.tags)?;
        }
        tx.commit()?;

        debug!("event=store_write module=store status=ok op=update kind=task id={id}");
        Ok(task)
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let removed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        debug!(
            "event=store_write module=store status=ok op=delete kind=task id={id} existed={}",
            removed > 0
        );
        Ok(removed > 0)
    }

    fn list(&self) -> RepoResult<Vec<Task>> {
        let mut links = TASK_TAGS.load_all(self.conn)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            let mut task = parse_task_row(row)?;
            task.tags = links.remove(&task.id).unwrap_or_default();
            tasks.push(task);
        }
        Ok(tasks)
    }
}

fn fetch_task(conn: &Connection, id: &str) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut task = parse_task_row(row)?;
    task.tags = TASK_TAGS.load(conn, id)?;
    Ok(Some(task))
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let type_text: String = row.get("type")?;
    let kind = match TaskType::parse(&type_text) {
        TaskType::Unknown => {
            return Err(RepoError::InvalidData(format!(
                "invalid task type `{type_text}` in tasks.type"
            )));
        }
        known => known,
    };

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        date: row.get("date")?,
        time: row.get("time")?,
        kind,
        completed,
        created_at: row.get("created_at")?,
        tags: BTreeSet::new(),
        list_id: row.get("list_id")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
