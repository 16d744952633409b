//! Domain model for tasks, notes, lists and tags.
//!
//! # Responsibility
//! - Define the client-facing record shapes (camelCase JSON).
//! - Own creation factories and partial-update merge rules.
//!
//! # Invariants
//! - Cross-entity references are soft: nothing here checks existence.
//! - Validation happens in factories/merges, before any write.

pub mod entity;
pub mod list;
pub mod note;
pub mod palette;
pub mod tag;
pub mod task;
mod wire;
