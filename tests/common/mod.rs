//! Shared test utilities and fixtures

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use parliament_core::{Parliament, ParliamentOptions};
use parliament_store::{JsonFileStore, MemoryStore};
use tempfile::TempDir;

/// Fixed instant used as "now" in deterministic tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Initialized in-memory parliament with a reigning identity.
pub fn reigning() -> Parliament<MemoryStore> {
    let parliament = Parliament::new(MemoryStore::new(), ParliamentOptions::default());
    parliament.init(None).unwrap();
    parliament.create_identity("Builder", "Start of the year").unwrap();
    parliament
}

/// Initialized file-backed parliament in a fresh temp dir.
///
/// Keep the `TempDir` alive for as long as the parliament is used.
pub fn file_backed() -> (TempDir, Parliament<JsonFileStore>) {
    let dir = tempfile::tempdir().unwrap();
    let parliament = Parliament::new(
        JsonFileStore::new(dir.path().join("data")),
        ParliamentOptions::default(),
    );
    parliament.init(None).unwrap();
    (dir, parliament)
}

/// Every permanent seat name, in canonical order.
pub const SEAT_NAMES: [&str; 6] = [
    "Short-Term",
    "Mid-Term",
    "Long-Term",
    "Purpose",
    "Ultimate",
    "Acting-Identity",
];
