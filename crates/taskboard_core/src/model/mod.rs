//! Board domain model.
//!
//! # Responsibility
//! - Define the task record and its enumerated fields.
//! - Keep one serialized shape shared by storage, views and the CLI.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion removes the record; there are no tombstones.

pub mod task;
