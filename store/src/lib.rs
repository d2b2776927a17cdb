//! Persistence for the parliament.
//!
//! A [`Store`] holds one [`ParliamentState`] and an append-only emergency
//! audit log. Callers take the store lock for the whole
//! load → transition → save sequence.

mod json_file;
mod memory;
mod retry;

use std::io;
use std::path::PathBuf;

use parliament_types::{EmergencyLogEntry, ParliamentState};
use thiserror::Error;

pub use json_file::{EMERGENCY_LOG_FILE, FileLock, JsonFileStore, LOCK_FILE, STATE_FILE};
pub use memory::{MemoryLock, MemoryStore};
pub use retry::retry_once;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("state file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("state file {} has format version {found}, newer than this build supports", .path.display())]
    UnsupportedVersion { path: PathBuf, found: u32 },
    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("parliament is locked by another process ({})", .path.display())]
    Locked { path: PathBuf },
    #[error("failed to append to emergency log {}: {source}", .path.display())]
    AuditLog { path: PathBuf, source: io::Error },
    #[error("emergency log {} is corrupt at line {line}: {source}", .path.display())]
    CorruptAuditLog {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

/// Get/put persistence for a single parliament.
pub trait Store {
    /// Held for the duration of one command; released on drop.
    type Lock;

    /// Take the exclusive lock. Fails fast with [`StorageError::Locked`] when
    /// another holder exists.
    fn lock(&self) -> Result<Self::Lock, StorageError>;

    /// `Ok(None)` when nothing has been saved yet. Unreadable or corrupt data is
    /// an error; it is never replaced with a fresh state.
    fn load(&self) -> Result<Option<ParliamentState>, StorageError>;

    fn save(&self, state: &ParliamentState) -> Result<(), StorageError>;

    /// Append one audit record. Existing records are never touched.
    fn append_emergency(&self, entry: &EmergencyLogEntry) -> Result<(), StorageError>;

    /// Every audit record, oldest first.
    fn emergency_log(&self) -> Result<Vec<EmergencyLogEntry>, StorageError>;
}
