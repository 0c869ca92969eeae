//! In-memory key-value repository.
//!
//! Backs ephemeral boards and lets tests inject write failures without
//! touching SQLite.

use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Single-threaded in-memory key-value repository.
#[derive(Debug, Default)]
pub struct MemoryKvRepository {
    entries: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryKvRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let repo = Self::default();
        repo.entries.borrow_mut().insert(key.into(), value.into());
        repo
    }

    /// Makes every subsequent `put` fail with `RepoError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_writable(&self) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl KvRepository for MemoryKvRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        self.check_writable()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
