//! SQLite bootstrap for the entity store.
//!
//! # Responsibility
//! - Open file-backed or in-memory connections with the pragmas the store
//!   relies on.
//! - Run schema migrations before any entity table is touched.
//!
//! # Invariants
//! - `foreign_keys=ON` so tag links cascade with their owning task/note.
//! - Schema version lives in `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Connection shared between the HTTP server and in-process transports.
pub type SharedConnection = Arc<Mutex<rusqlite::Connection>>;

/// Wraps a ready connection for sharing across handlers.
pub fn share(conn: rusqlite::Connection) -> SharedConnection {
    Arc::new(Mutex::new(conn))
}

/// Runs `f` while holding the shared connection.
///
/// The lock is held only for the duration of `f`; a poisoned lock is
/// reported instead of propagating the panic.
pub fn with_shared<T>(
    shared: &SharedConnection,
    f: impl FnOnce(&rusqlite::Connection) -> T,
) -> DbResult<T> {
    let conn = shared.lock().map_err(|_| DbError::LockPoisoned)?;
    Ok(f(&*conn))
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A thread panicked while holding the shared connection.
    LockPoisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::LockPoisoned => f.write_str("shared store connection is poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::LockPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
