use taskboard_core::{
    seed_tasks, BoardSession, CardAction, DragEndEvent, DragLocation, DropOutcome, FormError,
    FormMode, KvRepository, MemoryKvRepository, Priority, StoreError, SubmitOutcome, Task,
    TaskStatus, TaskStore, DEFAULT_STORAGE_KEY,
};

fn session(repo: &MemoryKvRepository) -> BoardSession<&MemoryKvRepository> {
    BoardSession::new(TaskStore::load(repo).unwrap())
}

fn stored_tasks(repo: &MemoryKvRepository) -> Vec<Task> {
    let raw = repo.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn create_flow_adds_task_and_closes_form() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);

    let form = session.open_create_form();
    form.set_title("Plan sprint");
    form.set_priority(Priority::High);

    let outcome = session.submit_form().unwrap();

    let SubmitOutcome::Created(created) = outcome else {
        panic!("expected created outcome");
    };
    assert_eq!(created.title, "Plan sprint");
    assert_eq!(created.status, TaskStatus::Todo);
    assert!(session.form().is_none());
    assert_eq!(session.tasks().last(), Some(&created));
    assert_eq!(stored_tasks(&repo).len(), 4);
    assert_eq!(session.board().column(TaskStatus::Todo).count(), 2);
}

#[test]
fn edit_flow_updates_task_in_place() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);

    assert!(session.apply(CardAction::Edit("3".to_string())).unwrap());
    let form = session.form_mut().unwrap();
    assert_eq!(form.mode(), &FormMode::Edit("3".to_string()));
    form.set_description("Add the three latest projects");

    let outcome = session.submit_form().unwrap();

    assert_eq!(outcome, SubmitOutcome::Updated { applied: true });
    assert!(session.form().is_none());
    let stored = stored_tasks(&repo).remove(2);
    assert_eq!(stored.id, "3");
    assert_eq!(stored.description, "Add the three latest projects");
    assert_eq!(stored.title, "Update portfolio");
}

#[test]
fn edit_of_missing_task_opens_nothing() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);

    assert!(!session.apply(CardAction::Edit("nope".to_string())).unwrap());
    assert!(session.form().is_none());
}

#[test]
fn invalid_submission_keeps_form_open() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);
    session.open_create_form();

    let err = session.submit_form().unwrap_err();

    assert!(matches!(err, FormError::Validation(_)));
    assert!(session.form().is_some());
    assert_eq!(repo.write_count(), 0);
}

#[test]
fn submit_without_open_form_is_rejected() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);

    assert!(matches!(session.submit_form(), Err(FormError::Closed)));
}

#[test]
fn deleting_task_under_edit_ends_the_session() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);
    session.begin_edit("1").unwrap();

    assert!(session.apply(CardAction::Delete("1".to_string())).unwrap());
    assert!(session.form().is_none());
    assert!(!session.delete_task("1").unwrap());
    assert_eq!(session.tasks().len(), 2);
}

#[test]
fn persist_failure_on_create_closes_form_and_keeps_task() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);
    session.open_create_form().set_title("offline");
    repo.set_fail_writes(true);

    let err = session.submit_form().unwrap_err();

    let task = match err {
        FormError::Handler(StoreError::CreatedUnsaved { task, .. }) => task,
        other => panic!("unexpected error: {other:?}"),
    };
    assert!(session.form().is_none());
    assert_eq!(session.tasks().len(), 4);
    assert_eq!(session.tasks()[3], *task);
}

#[test]
fn drag_end_moves_task_between_columns() {
    let repo = MemoryKvRepository::new();
    let mut session = session(&repo);
    let source = session.board().locate("2").unwrap();

    let outcome = session
        .drag_end(&DragEndEvent {
            draggable_id: "2".to_string(),
            source,
            destination: Some(DragLocation::column(TaskStatus::Completed, 1)),
        })
        .unwrap();

    assert!(matches!(outcome, DropOutcome::Moved { .. }));
    assert!(session.board().column(TaskStatus::InProgress).is_empty());
    assert_eq!(session.board().column(TaskStatus::Completed).count(), 2);
    assert_eq!(stored_tasks(&repo)[1].status, TaskStatus::Completed);
    assert_eq!(session.into_store().tasks().len(), seed_tasks().len());
}
