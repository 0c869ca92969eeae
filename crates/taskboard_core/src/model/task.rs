//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record rendered by every board column.
//! - Provide the draft shape used by create flows and field validation.
//! - Own the fixed seed set used when no valid persisted state exists.
//!
//! # Invariants
//! - `id` is stable and unique within one task collection.
//! - `status` is always one of the three board columns.
//! - Serialized field and enum spellings match the persisted JSON layout.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable identifier of a task.
///
/// Seed tasks use short numeric strings, created tasks use UUID v4 text.
pub type TaskId = String;

/// Display-only urgency category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Every priority in ascending order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Wire spelling used in persisted JSON and CLI input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Capitalized badge label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TaskValidationError::UnknownPriority(value.to_string())),
        }
    }
}

/// Board column a task belongs to.
///
/// The wire value doubles as the column (drop target) identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Work is in progress.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Columns in board display order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Wire spelling, also used as the column identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
        }
    }

    /// Column heading shown on the board.
    pub fn column_title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Parses a column identifier exactly as it appears on the wire.
    pub fn from_column_id(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "inProgress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    /// Lenient parse for human input: accepts the wire id plus
    /// `in_progress`/`in-progress` and any letter case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], "");
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(TaskValidationError::UnknownStatus(value.to_string())),
        }
    }
}

/// Validation errors for task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    BlankTitle,
    /// Task id is empty or whitespace only.
    BlankId,
    /// Priority text is not one of `low|medium|high`.
    UnknownPriority(String),
    /// Status text is not one of the board columns.
    UnknownStatus(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::BlankId => write!(f, "task id must not be blank"),
            Self::UnknownPriority(value) => {
                write!(f, "unknown priority `{value}`; expected low|medium|high")
            }
            Self::UnknownStatus(value) => write!(
                f,
                "unknown status `{value}`; expected todo|inProgress|completed"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Task fields without identity, as collected by the create form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Creates a draft with the given title and default remaining fields.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks required-field presence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }

    /// Attaches an identity and produces a full task record.
    pub fn into_task(self, id: impl Into<TaskId>) -> Task {
        Task {
            id: id.into(),
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
        }
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier, unique within the board.
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Column placement.
    pub status: TaskStatus,
}

impl Task {
    /// Checks id and title presence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::BlankId);
        }
        validate_title(&self.title)
    }

    /// Returns the editable fields of this task.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
        }
    }
}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(())
}

/// Returns the fixed fallback task set used when storage is empty or broken.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "1".to_string(),
            title: "Complete project proposal".to_string(),
            description: "Draft the initial project proposal with timeline and budget estimates"
                .to_string(),
            priority: Priority::High,
            status: TaskStatus::Todo,
        },
        Task {
            id: "2".to_string(),
            title: "Research competitors".to_string(),
            description: "Analyze top 5 competitors in the market".to_string(),
            priority: Priority::Medium,
            status: TaskStatus::InProgress,
        },
        Task {
            id: "3".to_string(),
            title: "Update portfolio".to_string(),
            description: "Add recent projects to online portfolio".to_string(),
            priority: Priority::Low,
            status: TaskStatus::Completed,
        },
    ]
}
