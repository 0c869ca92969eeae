//! Task store: the single owner of the board's task collection.
//!
//! # Responsibility
//! - Load the persisted collection at startup, falling back to seed data.
//! - Apply create/update/delete/status mutations in place.
//! - Persist the full collection after every applied mutation.
//!
//! # Invariants
//! - Task ids are unique within the collection.
//! - Insertion order is preserved; mutations never reorder tasks.
//! - Mutations that reference a missing id change nothing and write nothing.
//! - A failed persistence write keeps the in-memory mutation applied.

use crate::model::task::{seed_tasks, Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
use crate::repo::kv_repo::{KvRepository, RepoError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Storage key holding the serialized task array.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from task store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Input task fields are invalid; nothing was changed.
    Validation(TaskValidationError),
    /// Reading persisted state failed at the storage layer.
    Read(RepoError),
    /// Writing the collection failed; the in-memory change is kept.
    Persist(RepoError),
    /// `add` appended `task` but writing the collection failed.
    CreatedUnsaved { task: Box<Task>, source: RepoError },
    /// The collection could not be serialized.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Read(err) => write!(f, "failed to read board state: {err}"),
            Self::Persist(err) => write!(f, "failed to save board state: {err}"),
            Self::CreatedUnsaved { task, source } => write!(
                f,
                "created task `{}` but failed to save board state: {source}",
                task.id
            ),
            Self::Encode(err) => write!(f, "failed to encode board state: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Read(err) | Self::Persist(err) => Some(err),
            Self::CreatedUnsaved { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Where the collection came from at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Valid persisted state was found.
    Persisted,
    /// Nothing was stored under the key; seed data is used.
    SeedMissing,
    /// Stored data could not be decoded; seed data is used.
    SeedMalformed,
}

/// Result of loading the collection from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    pub source: LoadSource,
}

/// Result of a keyed mutation.
///
/// `tasks` is the authoritative collection after the call, for redisplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation<'a> {
    /// `false` when the referenced id was absent and nothing changed.
    pub applied: bool,
    pub tasks: &'a [Task],
}

/// Reads the task collection stored under `key`.
///
/// Absent or undecodable data (non-text values, bad JSON, unknown enum
/// values, missing fields, blank or duplicate ids) yields the seed set.
///
/// # Errors
/// - Returns `StoreError::Read` when the storage backend itself fails.
pub fn load_tasks<R: KvRepository>(repo: &R, key: &str) -> StoreResult<LoadedTasks> {
    let raw = match repo.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=board_load module=store status=seed reason=missing key={key}");
            return Ok(LoadedTasks {
                tasks: seed_tasks(),
                source: LoadSource::SeedMissing,
            });
        }
        Err(RepoError::Undecodable { reason, .. }) => return Ok(malformed(key, &reason)),
        Err(err) => return Err(StoreError::Read(err)),
    };

    match decode_tasks(&raw) {
        Ok(tasks) => {
            info!(
                "event=board_load module=store status=ok key={key} task_count={}",
                tasks.len()
            );
            Ok(LoadedTasks {
                tasks,
                source: LoadSource::Persisted,
            })
        }
        Err(reason) => Ok(malformed(key, &reason)),
    }
}

fn malformed(key: &str, reason: &str) -> LoadedTasks {
    warn!("event=board_load module=store status=seed reason=malformed key={key} error={reason}");
    LoadedTasks {
        tasks: seed_tasks(),
        source: LoadSource::SeedMalformed,
    }
}

/// Serializes the full collection and writes it under `key`.
///
/// # Errors
/// - `StoreError::Encode` when serialization fails.
/// - `StoreError::Persist` when the storage write fails.
pub fn persist_tasks<R: KvRepository>(repo: &R, key: &str, tasks: &[Task]) -> StoreResult<()> {
    let encoded = serde_json::to_string(tasks).map_err(StoreError::Encode)?;
    repo.put(key, &encoded).map_err(|err| {
        error!("event=board_persist module=store status=error key={key} error={err}");
        StoreError::Persist(err)
    })?;
    debug!(
        "event=board_persist module=store status=ok key={key} task_count={}",
        tasks.len()
    );
    Ok(())
}

fn decode_tasks(raw: &str) -> Result<Vec<Task>, String> {
    let tasks: Vec<Task> = serde_json::from_str(raw).map_err(|err| err.to_string())?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if task.id.trim().is_empty() {
            return Err("task with blank id".to_string());
        }
        if !seen.insert(task.id.as_str()) {
            return Err(format!("duplicate task id `{}`", task.id));
        }
    }
    Ok(tasks)
}

/// Owned task collection with synchronous load/mutate/persist lifecycle.
pub struct TaskStore<R: KvRepository> {
    repo: R,
    key: String,
    tasks: Vec<Task>,
    source: LoadSource,
}

impl<R: KvRepository> TaskStore<R> {
    /// Loads the store from the default storage key.
    pub fn load(repo: R) -> StoreResult<Self> {
        Self::load_with_key(repo, DEFAULT_STORAGE_KEY)
    }

    /// Loads the store from a caller-chosen storage key.
    ///
    /// Loading never writes; seed data is persisted on the first mutation.
    pub fn load_with_key(repo: R, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        let loaded = load_tasks(&repo, &key)?;
        Ok(Self {
            repo,
            key,
            tasks: loaded.tasks,
            source: loaded.source,
        })
    }

    /// Current collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Creates a task from `draft` with a fresh unique id and appends it.
    ///
    /// # Errors
    /// - `StoreError::Validation` when the title is blank; nothing changes.
    /// - `StoreError::CreatedUnsaved` carrying the new task when the write
    ///   fails; the task stays appended.
    pub fn add(&mut self, draft: TaskDraft) -> StoreResult<Task> {
        draft.validate()?;

        let task = draft.into_task(self.next_id());
        self.tasks.push(task.clone());
        info!(
            "event=task_add module=store status=ok task_id={} status={}",
            task.id, task.status
        );
        match self.persist() {
            Ok(()) => Ok(task),
            Err(StoreError::Persist(source)) => Err(StoreError::CreatedUnsaved {
                task: Box::new(task),
                source,
            }),
            Err(err) => Err(err),
        }
    }

    /// Replaces the stored task that has the same id as `task`.
    ///
    /// # Errors
    /// - `StoreError::Validation` when the replacement is invalid.
    /// - `StoreError::Persist` when the write fails; the replacement is kept.
    pub fn update(&mut self, task: Task) -> StoreResult<Mutation<'_>> {
        task.validate()?;

        let Some(slot) = self.tasks.iter_mut().find(|stored| stored.id == task.id) else {
            debug!(
                "event=task_update module=store status=noop reason=not_found task_id={}",
                task.id
            );
            return Ok(self.unchanged());
        };
        info!("event=task_update module=store status=ok task_id={}", task.id);
        *slot = task;
        self.persist()?;
        Ok(self.changed())
    }

    /// Deletes the task with `id`; repeated calls are no-ops.
    pub fn remove(&mut self, id: &str) -> StoreResult<Mutation<'_>> {
        let Some(position) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_remove module=store status=noop reason=not_found task_id={id}");
            return Ok(self.unchanged());
        };
        self.tasks.remove(position);
        info!("event=task_remove module=store status=ok task_id={id}");
        self.persist()?;
        Ok(self.changed())
    }

    /// Replaces only the `status` field of the task with `id`.
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> StoreResult<Mutation<'_>> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(
                "event=task_set_status module=store status=noop reason=not_found task_id={id}"
            );
            return Ok(self.unchanged());
        };
        let previous = task.status;
        task.status = status;
        info!(
            "event=task_set_status module=store status=ok task_id={id} from={previous} to={status}"
        );
        self.persist()?;
        Ok(self.changed())
    }

    /// Writes the full current collection to storage.
    pub fn persist(&self) -> StoreResult<()> {
        persist_tasks(&self.repo, &self.key, &self.tasks)
    }

    /// Consumes the store and returns its repository.
    pub fn into_repo(self) -> R {
        self.repo
    }

    fn next_id(&self) -> TaskId {
        loop {
            let candidate = Uuid::new_v4().to_string();
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn changed(&self) -> Mutation<'_> {
        Mutation {
            applied: true,
            tasks: &self.tasks,
        }
    }

    fn unchanged(&self) -> Mutation<'_> {
        Mutation {
            applied: false,
            tasks: &self.tasks,
        }
    }
}
