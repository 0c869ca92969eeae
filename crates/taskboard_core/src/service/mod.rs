//! Core use-case services.
//!
//! # Responsibility
//! - Own the task collection and its persistence lifecycle.
//! - Translate form submissions and drag gestures into store mutations.
//! - Keep front ends decoupled from storage details.

pub mod board_session;
pub mod drag;
pub mod task_form;
pub mod task_store;
