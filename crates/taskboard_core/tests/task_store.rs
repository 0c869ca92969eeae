use std::collections::HashSet;
use taskboard_core::db::{open_db, open_db_in_memory};
use taskboard_core::{
    load_tasks, persist_tasks, seed_tasks, KvRepository, LoadSource, MemoryKvRepository,
    Priority, SqliteKvRepository, StoreError, Task, TaskDraft, TaskStatus, TaskStore,
    TaskValidationError, DEFAULT_STORAGE_KEY,
};

fn empty_store(repo: &MemoryKvRepository) -> TaskStore<&MemoryKvRepository> {
    repo.put(DEFAULT_STORAGE_KEY, "[]").unwrap();
    TaskStore::load(repo).unwrap()
}

fn draft(title: &str, status: TaskStatus) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: String::new(),
        priority: Priority::Low,
        status,
    }
}

fn stored_tasks(repo: &MemoryKvRepository) -> Vec<Task> {
    let raw = repo.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn load_without_persisted_state_uses_seed_and_does_not_write() {
    let repo = MemoryKvRepository::new();
    let store = TaskStore::load(&repo).unwrap();

    assert_eq!(store.tasks(), seed_tasks().as_slice());
    assert_eq!(store.load_source(), LoadSource::SeedMissing);
    assert_eq!(repo.write_count(), 0);
}

#[test]
fn load_with_malformed_state_falls_back_to_seed() {
    for raw in [
        "not json",
        r#"{"id":"1"}"#,
        r#"[{"id":"1","title":"x"}]"#,
        r#"[{"id":"1","title":"x","description":"","priority":"urgent","status":"todo"}]"#,
    ] {
        let repo = MemoryKvRepository::with_entry(DEFAULT_STORAGE_KEY, raw);
        let store = TaskStore::load(&repo).unwrap();

        assert_eq!(store.tasks(), seed_tasks().as_slice(), "input: {raw}");
        assert_eq!(store.load_source(), LoadSource::SeedMalformed);
    }
}

#[test]
fn load_with_empty_array_yields_empty_board() {
    let repo = MemoryKvRepository::with_entry(DEFAULT_STORAGE_KEY, "[]");
    let store = TaskStore::load(&repo).unwrap();

    assert!(store.is_empty());
    assert_eq!(store.load_source(), LoadSource::Persisted);
}

#[test]
fn add_on_empty_store_generates_id_and_persists() {
    let repo = MemoryKvRepository::new();
    let mut store = empty_store(&repo);

    let created = store.add(draft("X", TaskStatus::Todo)).unwrap();

    assert_eq!(store.len(), 1);
    assert!(!created.id.is_empty());
    assert_eq!(created.title, "X");
    assert_eq!(created.description, "");
    assert_eq!(created.priority, Priority::Low);
    assert_eq!(created.status, TaskStatus::Todo);
    assert_eq!(store.tasks()[0], created);
    assert_eq!(stored_tasks(&repo), vec![created]);
}

#[test]
fn repeated_adds_never_produce_duplicate_ids_and_keep_order() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();

    for index in 0..50 {
        store
            .add(draft(&format!("task {index}"), TaskStatus::InProgress))
            .unwrap();
    }

    let ids: HashSet<&str> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids.len(), store.len());
    assert_eq!(store.len(), 53);
    assert_eq!(store.tasks()[0].id, "1");
    assert_eq!(store.tasks()[3].title, "task 0");
    assert_eq!(store.tasks()[52].title, "task 49");
}

#[test]
fn add_rejects_blank_title_without_writing() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();

    let err = store.add(draft("   ", TaskStatus::Todo)).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::BlankTitle)
    ));
    assert_eq!(store.len(), 3);
    assert_eq!(repo.write_count(), 0);
}

#[test]
fn update_replaces_matching_task_in_place() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();

    let mut edited = store.get("2").unwrap().clone();
    edited.title = "Research top competitors".to_string();
    edited.priority = Priority::High;

    let mutation = store.update(edited.clone()).unwrap();
    assert!(mutation.applied);
    assert_eq!(mutation.tasks[1], edited);

    let ids: Vec<&str> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert_eq!(stored_tasks(&repo)[1], edited);
}

#[test]
fn update_with_unknown_id_is_a_noop() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();

    let ghost = draft("ghost", TaskStatus::Completed).into_task("404");
    let mutation = store.update(ghost).unwrap();

    assert!(!mutation.applied);
    assert_eq!(mutation.tasks, seed_tasks().as_slice());
    assert_eq!(repo.write_count(), 0);
}

#[test]
fn remove_twice_is_idempotent() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();

    assert!(store.remove("1").unwrap().applied);
    let after_first: Vec<Task> = store.tasks().to_vec();
    let writes_after_first = repo.write_count();

    let second = store.remove("1").unwrap();
    assert!(!second.applied);
    assert_eq!(second.tasks, after_first.as_slice());
    assert_eq!(repo.write_count(), writes_after_first);
    assert_eq!(stored_tasks(&repo), after_first);
}

#[test]
fn set_status_changes_only_the_status_field() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();
    let before = store.tasks().to_vec();

    store.set_status("1", TaskStatus::Completed).unwrap();

    let after = store.tasks();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(after) {
        if old.id == "1" {
            assert_eq!(new.status, TaskStatus::Completed);
            assert_eq!(
                Task {
                    status: old.status,
                    ..new.clone()
                },
                *old
            );
        } else {
            assert_eq!(new, old);
        }
    }
}

#[test]
fn seeded_store_moving_task_two_to_completed() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();

    let mutation = store.set_status("2", TaskStatus::Completed).unwrap();

    let completed = mutation
        .tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .count();
    let in_progress = mutation
        .tasks
        .iter()
        .filter(|task| task.status == TaskStatus::InProgress)
        .count();
    assert_eq!(completed, 2);
    assert_eq!(in_progress, 0);
}

#[test]
fn set_status_on_unknown_id_is_ignored() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();

    let mutation = store.set_status("missing", TaskStatus::Todo).unwrap();

    assert!(!mutation.applied);
    assert_eq!(store.tasks(), seed_tasks().as_slice());
}

#[test]
fn persist_then_load_round_trips_collection() {
    let repo = MemoryKvRepository::new();
    let mut tasks = seed_tasks();
    tasks.push(Task {
        id: "f3b1".to_string(),
        title: "Multi\nline".to_string(),
        description: "quotes \" and unicode ✓".to_string(),
        priority: Priority::Medium,
        status: TaskStatus::Completed,
    });

    persist_tasks(&repo, "board", &tasks).unwrap();
    let loaded = load_tasks(&repo, "board").unwrap();

    assert_eq!(loaded.source, LoadSource::Persisted);
    assert_eq!(loaded.tasks, tasks);
}

#[test]
fn persistence_failure_keeps_in_memory_change_and_reports_error() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();
    repo.set_fail_writes(true);

    let err = store.set_status("1", TaskStatus::InProgress).unwrap_err();

    assert!(matches!(err, StoreError::Persist(_)));
    assert_eq!(store.get("1").unwrap().status, TaskStatus::InProgress);
    assert_eq!(repo.get(DEFAULT_STORAGE_KEY).unwrap(), None);
}

#[test]
fn add_persistence_failure_returns_created_task() {
    let repo = MemoryKvRepository::new();
    let mut store = TaskStore::load(&repo).unwrap();
    repo.set_fail_writes(true);

    let err = store.add(draft("offline", TaskStatus::Todo)).unwrap_err();

    let task = match err {
        StoreError::CreatedUnsaved { task, .. } => task,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(task.title, "offline");
    assert_eq!(store.get(&task.id), Some(task.as_ref()));
    assert_eq!(store.len(), 4);
}

#[test]
fn sqlite_non_text_value_falls_back_to_seed() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES ('tasks', X'FFFE00'), ('legacy', CAST(X'FFFE' AS TEXT));",
        [],
    )
    .unwrap();

    for key in ["tasks", "legacy"] {
        let store = TaskStore::load_with_key(SqliteKvRepository::new(&conn), key).unwrap();
        assert_eq!(store.tasks(), seed_tasks().as_slice());
        assert_eq!(store.load_source(), LoadSource::SeedMalformed);
    }

    let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();
    store.remove("2").unwrap();
    let reloaded = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();
    assert_eq!(reloaded.load_source(), LoadSource::Persisted);
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn sqlite_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let created = {
        let conn = open_db(&path).unwrap();
        let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();
        store.remove("3").unwrap();
        store.add(draft("persisted", TaskStatus::InProgress)).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();
    assert_eq!(store.load_source(), LoadSource::Persisted);
    let ids: Vec<&str> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", created.id.as_str()]);
}

#[test]
fn custom_storage_key_isolates_boards() {
    let conn = open_db_in_memory().unwrap();

    let mut work = TaskStore::load_with_key(SqliteKvRepository::new(&conn), "work").unwrap();
    work.remove("1").unwrap();

    let home = TaskStore::load_with_key(SqliteKvRepository::new(&conn), "home").unwrap();
    assert_eq!(home.storage_key(), "home");
    assert_eq!(home.len(), 3);
    assert_eq!(home.load_source(), LoadSource::SeedMissing);
}
