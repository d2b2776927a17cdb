//! In-memory store for tests and embedding.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parliament_types::{EmergencyLogEntry, ParliamentState};

use crate::{StorageError, Store, retry_once};

const MEMORY_PATH: &str = "<memory>";

#[derive(Debug, Default)]
struct Inner {
    state: Option<ParliamentState>,
    emergency_log: Vec<EmergencyLogEntry>,
    locked: bool,
    save_failures: u32,
    audit_log_broken: bool,
}

/// Shares its contents between clones, so a test can keep a handle while the
/// parliament owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

fn memory_path() -> PathBuf {
    PathBuf::from(MEMORY_PATH)
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `count` save attempts fail with a transient I/O error.
    pub fn inject_save_failures(&self, count: u32) {
        self.inner().save_failures = count;
    }

    /// Make every emergency log append fail.
    pub fn break_audit_log(&self, broken: bool) {
        self.inner().audit_log_broken = broken;
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<ParliamentState> {
        self.inner().state.clone()
    }
}

/// Lock on a [`MemoryStore`]. Released on drop.
#[derive(Debug)]
pub struct MemoryLock {
    inner: Arc<Mutex<Inner>>,
}

impl Drop for MemoryLock {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .locked = false;
    }
}

impl Store for MemoryStore {
    type Lock = MemoryLock;

    fn lock(&self) -> Result<MemoryLock, StorageError> {
        let mut inner = self.inner();
        if inner.locked {
            return Err(StorageError::Locked {
                path: memory_path(),
            });
        }
        inner.locked = true;
        Ok(MemoryLock {
            inner: Arc::clone(&self.inner),
        })
    }

    fn load(&self) -> Result<Option<ParliamentState>, StorageError> {
        Ok(self.inner().state.clone())
    }

    fn save(&self, state: &ParliamentState) -> Result<(), StorageError> {
        let mut inner = self.inner();
        retry_once("write state", || {
            if inner.save_failures > 0 {
                inner.save_failures -= 1;
                return Err(io::Error::other("injected save failure"));
            }
            inner.state = Some(state.clone());
            Ok(())
        })
        .map_err(|source| StorageError::Write {
            path: memory_path(),
            source,
        })
    }

    fn append_emergency(&self, entry: &EmergencyLogEntry) -> Result<(), StorageError> {
        let mut inner = self.inner();
        if inner.audit_log_broken {
            return Err(StorageError::AuditLog {
                path: memory_path(),
                source: io::Error::other("audit log unavailable"),
            });
        }
        inner.emergency_log.push(entry.clone());
        Ok(())
    }

    fn emergency_log(&self) -> Result<Vec<EmergencyLogEntry>, StorageError> {
        Ok(self.inner().emergency_log.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use parliament_types::ParliamentState;

    use super::MemoryStore;
    use crate::{StorageError, Store};

    #[test]
    fn lock_is_exclusive_until_dropped() {
        let store = MemoryStore::new();
        let guard = store.lock().unwrap();
        assert!(matches!(store.lock(), Err(StorageError::Locked { .. })));
        drop(guard);
        assert!(store.lock().is_ok());
    }

    #[test]
    fn one_transient_failure_is_absorbed() {
        let store = MemoryStore::new();
        let state = ParliamentState::new(Utc::now(), None);

        store.inject_save_failures(1);
        store.save(&state).unwrap();
        assert_eq!(store.snapshot(), Some(state.clone()));

        store.inject_save_failures(2);
        assert!(matches!(store.save(&state), Err(StorageError::Write { .. })));
    }

    #[test]
    fn clones_share_contents() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save(&ParliamentState::new(Utc::now(), None)).unwrap();
        assert!(handle.load().unwrap().is_some());
    }
}
