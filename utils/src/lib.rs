//! Shared infrastructure utilities for the parliament.
//!
//! Filesystem helpers that don't belong in the domain-pure `parliament-types`
//! crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)
//! - **`append`**: Append-only line files for audit trails

pub mod append;
pub mod atomic_write;

pub use append::{append_line, read_lines};
pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, ParentDirSyncPolicy, PersistMode, atomic_write,
    atomic_write_with_options, backup_path, recover_bak_file,
};
