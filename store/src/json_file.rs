//! File-backed store.
//!
//! Layout under the data directory:
//!
//! - `parliament.json`: pretty JSON state, replaced atomically on every save
//! - `emergency.jsonl`: one JSON audit record per line, append-only
//! - `parliament.lock`: advisory OS lock; holds the holder's pid while locked

use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::process;

use parliament_types::{EmergencyLogEntry, ParliamentState, STATE_FORMAT_VERSION};
use parliament_utils::{
    AtomicWriteOptions, append_line, atomic_write_with_options, read_lines, recover_bak_file,
};

use crate::{StorageError, Store, retry_once};

pub const STATE_FILE: &str = "parliament.json";
pub const EMERGENCY_LOG_FILE: &str = "emergency.jsonl";
pub const LOCK_FILE: &str = "parliament.lock";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    #[must_use]
    pub fn emergency_log_path(&self) -> PathBuf {
        self.dir.join(EMERGENCY_LOG_FILE)
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    fn ensure_dir(&self) -> io::Result<()> {
        ensure_secure_dir(&self.dir)
    }
}

/// Create `path` (and parents), tightening a freshly created or world-readable
/// directory to 0700 where the platform allows it.
fn ensure_secure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)?.permissions().mode() & 0o777;
        if mode & 0o077 != 0
            && let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o700))
        {
            tracing::debug!(path = %path.display(), "Could not tighten data dir permissions: {e}");
        }
    }
    Ok(())
}

/// Exclusive advisory lock on `parliament.lock`. Released when dropped.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    file: File,
}

impl FileLock {
    /// The kernel drops the lock with its holder, so a crashed command never
    /// leaves the store locked. A pid left in the file marks such a crash.
    fn acquire(path: PathBuf) -> Result<Self, StorageError> {
        let opened = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path);
        let mut file = match opened {
            Ok(file) => file,
            Err(source) => return Err(StorageError::Write { path, source }),
        };
        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                tracing::warn!(path = %path.display(), "Store is locked");
                return Err(StorageError::Locked { path });
            }
            Err(TryLockError::Error(source)) => return Err(StorageError::Write { path, source }),
        }

        let mut previous = String::new();
        if file.read_to_string(&mut previous).is_ok() && !previous.trim().is_empty() {
            tracing::warn!(
                path = %path.display(),
                pid = previous.trim(),
                "Reclaimed stale lock left by an exited process"
            );
        }
        // Holder pid, for whoever finds the lock file.
        let recorded = file
            .set_len(0)
            .and_then(|()| file.rewind())
            .and_then(|()| writeln!(file, "{}", process::id()));
        if let Err(e) = recorded {
            tracing::debug!(path = %path.display(), "Failed to record pid in lock: {e}");
        }
        Ok(Self { path, file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let released = self.file.set_len(0).and_then(|()| self.file.unlock());
        if let Err(e) = released {
            tracing::warn!(path = %self.path.display(), "Failed to release lock: {e}");
        }
    }
}

impl Store for JsonFileStore {
    type Lock = FileLock;

    fn lock(&self) -> Result<FileLock, StorageError> {
        self.ensure_dir().map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;
        FileLock::acquire(self.lock_path())
    }

    fn load(&self) -> Result<Option<ParliamentState>, StorageError> {
        let path = self.state_path();
        recover_bak_file(&path);

        let content = match retry_once("read state", || fs::read_to_string(&path)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        let state: ParliamentState = serde_json::from_str(&content).map_err(|source| {
            tracing::warn!(path = %path.display(), "State file is corrupt: {source}");
            StorageError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;
        if state.format_version > STATE_FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                path,
                found: state.format_version,
            });
        }
        tracing::debug!(path = %path.display(), "Loaded state");
        Ok(Some(state))
    }

    fn save(&self, state: &ParliamentState) -> Result<(), StorageError> {
        let path = self.state_path();
        let json = serde_json::to_string_pretty(state).map_err(StorageError::Encode)?;

        retry_once("write state", || {
            self.ensure_dir()?;
            atomic_write_with_options(&path, json.as_bytes(), AtomicWriteOptions::default())
        })
        .map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = json.len(), "Saved state");
        Ok(())
    }

    fn append_emergency(&self, entry: &EmergencyLogEntry) -> Result<(), StorageError> {
        let path = self.emergency_log_path();
        let line = serde_json::to_string(entry).map_err(StorageError::Encode)?;

        // Not retried: a half-applied append must not turn into a duplicate record.
        self.ensure_dir()
            .and_then(|()| append_line(&path, &line))
            .map_err(|source| StorageError::AuditLog { path, source })
    }

    fn emergency_log(&self) -> Result<Vec<EmergencyLogEntry>, StorageError> {
        let path = self.emergency_log_path();
        let lines = retry_once("read emergency log", || read_lines(&path)).map_err(|source| {
            StorageError::Read {
                path: path.clone(),
                source,
            }
        })?;

        lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| StorageError::CorruptAuditLog {
                    path: path.clone(),
                    line: idx + 1,
                    source,
                })
            })
            .collect()
    }
}
