//! Board session: the controller owning the store and the open form.
//!
//! # Responsibility
//! - Route form submissions to `add` or `update`.
//! - Delegate card edit/delete affordances and drag-end events to the store.
//! - Expose the board projection of the current collection.
//!
//! # Invariants
//! - At most one form is open at a time.
//! - A submission whose mutation was applied closes the form, even when the
//!   following persistence write failed.

use crate::model::task::Task;
use crate::repo::kv_repo::KvRepository;
use crate::service::drag::{handle_drag_end, DragEndEvent, DropOutcome};
use crate::service::task_form::{FormError, FormMode, FormSubmission, TaskForm};
use crate::service::task_store::{StoreError, StoreResult, TaskStore};
use crate::view::board::{Board, CardAction};
use log::debug;

/// Result of routing one form submission into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Task),
    /// `applied` is `false` when the edited task vanished meanwhile.
    Updated { applied: bool },
}

/// Maps a form submission onto the matching store mutation.
pub fn apply_submission<R: KvRepository>(
    store: &mut TaskStore<R>,
    submission: FormSubmission,
) -> StoreResult<SubmitOutcome> {
    match submission {
        FormSubmission::Create(draft) => store.add(draft).map(SubmitOutcome::Created),
        FormSubmission::Update(task) => {
            let mutation = store.update(task)?;
            Ok(SubmitOutcome::Updated {
                applied: mutation.applied,
            })
        }
    }
}

/// Interactive board state for one user.
pub struct BoardSession<R: KvRepository> {
    store: TaskStore<R>,
    form: Option<TaskForm>,
}

impl<R: KvRepository> BoardSession<R> {
    pub fn new(store: TaskStore<R>) -> Self {
        Self { store, form: None }
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    /// Column projection of the current collection.
    pub fn board(&self) -> Board<'_> {
        Board::project(self.store.tasks())
    }

    pub fn form(&self) -> Option<&TaskForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        self.form.as_mut()
    }

    /// Opens an empty create form, replacing any open form.
    pub fn open_create_form(&mut self) -> &mut TaskForm {
        self.form.insert(TaskForm::create())
    }

    /// Opens an edit form for `id`; returns `None` if the task is gone.
    pub fn begin_edit(&mut self, id: &str) -> Option<&mut TaskForm> {
        let Some(task) = self.store.get(id) else {
            debug!("event=form_open module=session status=noop reason=not_found task_id={id}");
            return None;
        };
        let form = TaskForm::edit(task);
        Some(self.form.insert(form))
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submits the open form into the store.
    ///
    /// # Errors
    /// - `FormError::Closed` when no form is open.
    /// - `FormError::Validation` when the title is blank; the form stays open.
    /// - `FormError::Handler` with the store error otherwise.
    pub fn submit_form(&mut self) -> Result<SubmitOutcome, FormError<StoreError>> {
        let form = self.form.as_mut().ok_or(FormError::Closed)?;
        let store = &mut self.store;
        let result = form.submit(|submission| apply_submission(store, submission));

        match &result {
            Ok(_)
            | Err(FormError::Handler(
                StoreError::Persist(_) | StoreError::CreatedUnsaved { .. },
            )) => self.form = None,
            Err(_) => {}
        }
        result
    }

    /// Runs a card affordance: edit opens the form, delete removes the task.
    pub fn apply(&mut self, action: CardAction) -> StoreResult<bool> {
        match action {
            CardAction::Edit(id) => Ok(self.begin_edit(&id).is_some()),
            CardAction::Delete(id) => self.delete_task(&id),
        }
    }

    /// Deletes `id`; returns whether a task was removed.
    pub fn delete_task(&mut self, id: &str) -> StoreResult<bool> {
        let applied = self.store.remove(id)?.applied;
        let editing_deleted = matches!(
            self.form.as_ref().map(TaskForm::mode),
            Some(FormMode::Edit(edit_id)) if edit_id == id
        );
        if editing_deleted {
            self.form = None;
        }
        Ok(applied)
    }

    pub fn drag_end(&mut self, event: &DragEndEvent) -> StoreResult<DropOutcome> {
        handle_drag_end(&mut self.store, event)
    }

    pub fn into_store(self) -> TaskStore<R> {
        self.store
    }
}
