//! Column partition of the task collection.
//!
//! # Invariants
//! - Every task lands in exactly one column, chosen only by its status.
//! - Relative order inside a column follows the source collection.

use crate::model::task::{Task, TaskId, TaskStatus};
use crate::service::drag::DragLocation;

/// Per-card affordance exposed by a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    Edit(TaskId),
    Delete(TaskId),
}

/// One status column with its borrowed tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    pub fn title(&self) -> &'static str {
        self.status.column_title()
    }

    /// Drop-target identifier of this column.
    pub fn droppable_id(&self) -> &'static str {
        self.status.as_str()
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Count caption such as `1 task` or `3 tasks`.
    pub fn count_label(&self) -> String {
        match self.count() {
            1 => "1 task".to_string(),
            n => format!("{n} tasks"),
        }
    }

    /// Index of `id` within this column.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Edit and delete affordances for one card.
    pub fn actions(task: &Task) -> [CardAction; 2] {
        [
            CardAction::Edit(task.id.clone()),
            CardAction::Delete(task.id.clone()),
        ]
    }
}

/// Three-column board projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<'a> {
    columns: [Column<'a>; 3],
}

impl<'a> Board<'a> {
    /// Partitions `tasks` by status in board display order.
    pub fn project(tasks: &'a [Task]) -> Self {
        let columns = TaskStatus::ALL.map(|status| Column {
            status,
            tasks: tasks.iter().filter(|task| task.status == status).collect(),
        });
        Self { columns }
    }

    pub fn columns(&self) -> &[Column<'a>] {
        &self.columns
    }

    pub fn column(&self, status: TaskStatus) -> &Column<'a> {
        let index = match status {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        };
        &self.columns[index]
    }

    /// Total number of cards across all columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(Column::count).sum()
    }

    /// Current column and in-column index of the card with `id`.
    pub fn locate(&self, id: &str) -> Option<DragLocation> {
        self.columns.iter().find_map(|column| {
            column
                .position_of(id)
                .map(|index| DragLocation::column(column.status, index))
        })
    }
}
