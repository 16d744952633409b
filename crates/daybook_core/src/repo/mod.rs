//! Entity store: keyed SQLite persistence per entity family.
//!
//! # Responsibility
//! - Atomic single-record create/read/update/delete for tasks, notes,
//!   lists and tags.
//! - Keep SQL details (tag link tables, derived list membership) inside the
//!   persistence boundary.
//!
//! # Invariants
//! - Writes run the model factory/merge validation before touching SQL.
//! - Each mutation is one transaction: row and tag links change together or
//!   not at all.
//! - `delete` is idempotent and hard-deletes.
//! - Listing returns insertion order; presentation order is the caller's.
//! - The store never notifies anyone; change fan-out lives in the façade.

use crate::db::DbError;
use crate::model::entity::{Entity, EntityKind, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod list_repo;
pub mod note_repo;
pub mod tag_repo;
pub mod task_repo;
mod tag_links;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level failure.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound { kind: EntityKind, id: String },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{} not found: {id}", kind.label()),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract shared by every entity store.
pub trait Repository<E: Entity> {
    /// Validates via the model factory, persists, and returns the stored row.
    fn create(&self, draft: E::Draft) -> RepoResult<E>;

    /// `Ok(None)` for a normal miss.
    fn get(&self, id: &str) -> RepoResult<Option<E>>;

    /// Merges `patch` over the stored record.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    fn update(&self, id: &str, patch: &E::Patch) -> RepoResult<E>;

    /// Removes the record. Returns whether a row existed; a miss is not an
    /// error.
    fn delete(&self, id: &str) -> RepoResult<bool>;

    /// All records in insertion order.
    fn list(&self) -> RepoResult<Vec<E>>;

    fn list_where<P>(&self, predicate: P) -> RepoResult<Vec<E>>
    where
        Self: Sized,
        P: Fn(&E) -> bool,
    {
        Ok(self.list()?.into_iter().filter(|record| predicate(record)).collect())
    }
}

pub(crate) fn not_found(kind: EntityKind, id: &str) -> RepoError {
    RepoError::NotFound {
        kind,
        id: id.to_string(),
    }
}

pub(crate) fn row_exists(
    conn: &rusqlite::Connection,
    table: &'static str,
    id: &str,
) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn ensure_new_id(
    conn: &rusqlite::Connection,
    table: &'static str,
    kind: EntityKind,
    id: &str,
) -> RepoResult<()> {
    if row_exists(conn, table, id)? {
        return Err(ValidationError::DuplicateId {
            kind,
            id: id.to_string(),
        }
        .into());
    }
    Ok(())
}
