//! Core domain logic for the task board.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{seed_tasks, Priority, Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use repo::memory_repo::MemoryKvRepository;
pub use service::board_session::{apply_submission, BoardSession, SubmitOutcome};
pub use service::drag::{handle_drag_end, DragEndEvent, DragLocation, DropOutcome, IgnoreReason};
pub use service::task_form::{FormError, FormMode, FormSubmission, TaskForm};
pub use service::task_store::{
    load_tasks, persist_tasks, LoadSource, LoadedTasks, Mutation, StoreError, StoreResult,
    TaskStore, DEFAULT_STORAGE_KEY,
};
pub use view::board::{Board, CardAction, Column};
pub use view::render::{render_board, render_card, render_column, CardDetail};

/// Minimal health-check API used by the CLI probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
