//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the task store persists through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Values are opaque UTF-8 text; repositories never interpret them.
//! - A write fully replaces the previous value stored under the key.

pub mod kv_repo;
pub mod memory_repo;
