//! Drag-end interpretation.
//!
//! # Responsibility
//! - Turn a completed drag gesture into at most one status change.
//!
//! # Invariants
//! - Only the destination column matters; the destination index never
//!   reorders tasks.
//! - Ignored drops never mutate or persist anything.

use crate::model::task::{TaskId, TaskStatus};
use crate::repo::kv_repo::KvRepository;
use crate::service::task_store::{StoreResult, TaskStore};
use log::debug;

/// A position inside a droppable column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragLocation {
    /// Column identifier (`todo|inProgress|completed`).
    pub droppable_id: String,
    pub index: usize,
}

impl DragLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }

    /// Location inside a known board column.
    pub fn column(status: TaskStatus, index: usize) -> Self {
        Self::new(status.as_str(), index)
    }
}

/// Gesture-completion signal from the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEndEvent {
    /// Id of the dragged task.
    pub draggable_id: TaskId,
    pub source: DragLocation,
    /// `None` when the task was dropped outside any column.
    pub destination: Option<DragLocation>,
}

/// Why a drag-end event produced no change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    NoDestination,
    /// Dropped back on its own column and index.
    SamePosition,
    UnknownTask,
    UnknownColumn(String),
}

/// Effect of handling one drag-end event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved {
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },
    Ignored(IgnoreReason),
}

/// Applies a drag-end event to the store.
///
/// # Errors
/// - Propagates `StoreError::Persist` from the underlying status write.
pub fn handle_drag_end<R: KvRepository>(
    store: &mut TaskStore<R>,
    event: &DragEndEvent,
) -> StoreResult<DropOutcome> {
    let outcome = match resolve(store, event) {
        Ok((from, to)) => {
            store.set_status(&event.draggable_id, to)?;
            DropOutcome::Moved {
                task_id: event.draggable_id.clone(),
                from,
                to,
            }
        }
        Err(reason) => {
            debug!(
                "event=drag_end module=drag status=ignored task_id={} reason={reason:?}",
                event.draggable_id
            );
            DropOutcome::Ignored(reason)
        }
    };
    Ok(outcome)
}

fn resolve<R: KvRepository>(
    store: &TaskStore<R>,
    event: &DragEndEvent,
) -> Result<(TaskStatus, TaskStatus), IgnoreReason> {
    let destination = event
        .destination
        .as_ref()
        .ok_or(IgnoreReason::NoDestination)?;
    if *destination == event.source {
        return Err(IgnoreReason::SamePosition);
    }

    let task = store
        .get(&event.draggable_id)
        .ok_or(IgnoreReason::UnknownTask)?;
    let to = TaskStatus::from_column_id(&destination.droppable_id)
        .ok_or_else(|| IgnoreReason::UnknownColumn(destination.droppable_id.clone()))?;
    Ok((task.status, to))
}
