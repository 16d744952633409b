//! Core of the Daybook planner: tasks, sticky notes, lists and tags.
//! This crate is the single source of truth for business invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod facade;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sync;

pub use api::{handle, handle_shared, ApiError, ApiRequest, ApiResponse};
pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, share, DbError, SharedConnection};
pub use facade::{DataFacade, LocalTransport, Transport, TransportError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::entity::{Entity, EntityKind, ValidationError};
pub use model::list::{List, ListDraft, ListPatch};
pub use model::note::{Note, NoteDraft, NotePatch};
pub use model::palette::Swatch;
pub use model::tag::{Tag, TagDraft, TagPatch};
pub use model::task::{Task, TaskDraft, TaskPatch, TaskType};
pub use repo::{RepoError, RepoResult, Repository};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
