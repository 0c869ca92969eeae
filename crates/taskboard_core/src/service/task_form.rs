//! Task form state for create and edit flows.
//!
//! # Responsibility
//! - Hold the local draft while the user types.
//! - Enforce the required title before handing the draft to the caller.
//!
//! # Invariants
//! - Create mode starts from defaults; edit mode starts from the task.
//! - The submit handler is never invoked with a blank title.
//! - A successful create resets the draft; a successful edit closes the form.

use crate::model::task::{Priority, Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Which flow the form is serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the task with this id.
    Edit(TaskId),
}

/// Payload handed to the submit handler.
///
/// Carries an id only for edits, so the caller can route to add or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create(TaskDraft),
    Update(Task),
}

/// Submit failure.
#[derive(Debug)]
pub enum FormError<E> {
    Validation(TaskValidationError),
    /// The editing session already ended.
    Closed,
    /// The caller's handler rejected the submission.
    Handler(E),
}

impl<E: Display> Display for FormError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Closed => write!(f, "task form is closed"),
            Self::Handler(err) => write!(f, "{err}"),
        }
    }
}

impl<E: Error + 'static> Error for FormError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Closed => None,
            Self::Handler(err) => Some(err),
        }
    }
}

/// Draft state backing the create/edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    mode: FormMode,
    draft: TaskDraft,
    open: bool,
}

impl TaskForm {
    /// Opens an empty form for creating a task.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: TaskDraft::default(),
            open: true,
        }
    }

    /// Opens a form seeded from an existing task.
    pub fn edit(task: &Task) -> Self {
        Self {
            mode: FormMode::Edit(task.id.clone()),
            draft: task.to_draft(),
            open: true,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create New Task",
            FormMode::Edit(_) => "Edit Task",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create Task",
            FormMode::Edit(_) => "Save Changes",
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.draft.priority = priority;
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.draft.status = status;
    }

    /// Validates the draft and passes it to `handler`.
    ///
    /// On handler success a create form resets to defaults and stays open,
    /// while an edit form closes. On any failure the draft is left as is.
    pub fn submit<T, E, F>(&mut self, handler: F) -> Result<T, FormError<E>>
    where
        F: FnOnce(FormSubmission) -> Result<T, E>,
    {
        if !self.open {
            return Err(FormError::Closed);
        }
        self.draft.validate().map_err(FormError::Validation)?;

        let submission = match &self.mode {
            FormMode::Create => FormSubmission::Create(self.draft.clone()),
            FormMode::Edit(id) => FormSubmission::Update(self.draft.clone().into_task(id.clone())),
        };
        let value = handler(submission).map_err(FormError::Handler)?;

        match self.mode {
            FormMode::Create => self.draft = TaskDraft::default(),
            FormMode::Edit(_) => self.open = false,
        }
        Ok(value)
    }

    /// Ends the session without submitting.
    pub fn cancel(&mut self) {
        self.open = false;
    }
}
