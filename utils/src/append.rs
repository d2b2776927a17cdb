//! Append-only line files.
//!
//! Each record is one line. Lines are written with a single `write_all` on a
//! handle opened in append mode, then synced, so an existing line is never
//! rewritten.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Append `line` plus a trailing newline to `path`, creating the file if needed.
///
/// Embedded newlines are rejected so one call always yields exactly one record.
pub fn append_line(path: impl AsRef<Path>, line: &str) -> io::Result<()> {
    if line.contains('\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "appended record must not contain a newline",
        ));
    }
    let path = path.as_ref();

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    let mut record = String::with_capacity(line.len() + 1);
    record.push_str(line);
    record.push('\n');
    file.write_all(record.as_bytes())?;
    file.sync_data()
}

/// All non-blank lines of `path`, or nothing if it does not exist yet.
pub fn read_lines(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
