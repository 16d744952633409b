//! Tag link tables (`task_tags`, `note_tags`).
//!
//! Links hold `tag_id` without a foreign key: deleting a tag leaves every
//! reference in place.

use super::RepoResult;
use rusqlite::{params, Connection};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy)]
pub(crate) struct LinkTable {
    table: &'static str,
    owner_column: &'static str,
}

pub(crate) const TASK_TAGS: LinkTable = LinkTable {
    table: "task_tags",
    owner_column: "task_id",
};

pub(crate) const NOTE_TAGS: LinkTable = LinkTable {
    table: "note_tags",
    owner_column: "note_id",
};

impl LinkTable {
    pub(crate) fn load(&self, conn: &Connection, owner_id: &str) -> RepoResult<BTreeSet<String>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT tag_id FROM {} WHERE {} = ?1;",
            self.table, self.owner_column
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut tags = BTreeSet::new();
        while let Some(row) = rows.next()? {
            tags.insert(row.get::<_, String>(0)?);
        }
        Ok(tags)
    }

    /// Loads every link grouped by owner, for collection reads.
    pub(crate) fn load_all(
        &self,
        conn: &Connection,
    ) -> RepoResult<HashMap<String, BTreeSet<String>>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, tag_id FROM {};",
            self.owner_column, self.table
        ))?;
        let mut rows = stmt.query([])?;
        let mut grouped: HashMap<String, BTreeSet<String>> = HashMap::new();
        while let Some(row) = rows.next()? {
            grouped
                .entry(row.get(0)?)
                .or_default()
                .insert(row.get(1)?);
        }
        Ok(grouped)
    }

    /// Replaces the whole tag set of `owner_id`. Run inside the caller's
    /// transaction.
    pub(crate) fn replace(
        &self,
        conn: &Connection,
        owner_id: &str,
        tags: &BTreeSet<String>,
    ) -> RepoResult<()> {
        conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1;", self.table, self.owner_column),
            [owner_id],
        )?;
        let mut insert = conn.prepare(&format!(
            "INSERT INTO {} ({}, tag_id) VALUES (?1, ?2);",
            self.table, self.owner_column
        ))?;
        for tag_id in tags {
            insert.execute(params![owner_id, tag_id])?;
        }
        Ok(())
    }
}
