//! Read-only board projections.
//!
//! # Responsibility
//! - Partition the task collection into status columns.
//! - Render columns and cards as plain text for terminal front ends.
//!
//! # Invariants
//! - Views borrow tasks from the store; they never own or mutate them.

pub mod board;
pub mod render;
