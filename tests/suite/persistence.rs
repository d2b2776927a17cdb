//! File-backed store behavior through the `Parliament` facade.

use std::fs;

use parliament_core::{Parliament, ParliamentError, ParliamentOptions, StateError};
use parliament_store::{JsonFileStore, MemoryStore, StorageError, Store};
use parliament_types::{EmergencyInitiator, ExportBundle, VoteMode};

use crate::common::{file_backed, reigning};

#[test]
fn state_survives_reopening_the_store() {
    let (dir, parliament) = file_backed();
    parliament.create_identity("Builder", "New city").unwrap();
    let decision = parliament
        .cast_vote("Sign the lease", Vec::new(), [("Purpose", "yes"), ("Ultimate", "yes"), ("Long-Term", "yes")])
        .unwrap();
    assert!(decision.passed());

    let reopened = Parliament::new(
        JsonFileStore::new(dir.path().join("data")),
        ParliamentOptions::default(),
    );
    let decisions = reopened.recent_decisions(10).unwrap();
    assert_eq!(decisions, vec![decision]);
    assert_eq!(
        reopened.current_identity().unwrap().map(|i| i.name().to_string()),
        Some("Builder".to_string())
    );
}

#[test]
fn corrupt_state_is_refused_and_left_untouched() {
    let (_dir, parliament) = file_backed();
    let path = parliament.store().state_path();
    fs::write(&path, "{ not json").unwrap();

    let err = parliament.create_identity("Builder", "").unwrap_err();
    assert!(matches!(
        err,
        ParliamentError::Storage(StorageError::Corrupt { .. })
    ));
    assert!(matches!(
        parliament.init(None),
        Err(ParliamentError::Storage(StorageError::Corrupt { .. }))
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn newer_format_version_is_refused() {
    let (_dir, parliament) = file_backed();
    let path = parliament.store().state_path();
    let raw = fs::read_to_string(&path).unwrap();
    let bumped = raw.replacen("\"format_version\": 1", "\"format_version\": 99", 1);
    fs::write(&path, bumped).unwrap();

    assert!(matches!(
        parliament.status(),
        Err(ParliamentError::Storage(StorageError::UnsupportedVersion { found: 99, .. }))
    ));
}

#[test]
fn held_lock_blocks_mutations() {
    let (_dir, parliament) = file_backed();
    let other = parliament.store().clone();
    let guard = other.lock().unwrap();

    assert!(matches!(
        parliament.create_identity("Builder", ""),
        Err(ParliamentError::Storage(StorageError::Locked { .. }))
    ));
    drop(guard);
    parliament.create_identity("Builder", "").unwrap();
    assert_eq!(fs::read_to_string(parliament.store().lock_path()).unwrap(), "");
}

#[test]
fn stale_lock_file_does_not_block_the_store() {
    let (_dir, parliament) = file_backed();
    fs::write(parliament.store().lock_path(), "424242\n").unwrap();

    parliament.create_identity("Builder", "").unwrap();
    assert_eq!(
        parliament.current_identity().unwrap().map(|i| i.name().to_string()),
        Some("Builder".to_string())
    );
}

#[test]
fn emergency_log_is_appended_before_the_latch_is_saved() {
    let (_dir, parliament) = file_backed();
    parliament.create_identity("Builder", "").unwrap();
    let record = parliament
        .record_session("daily", [("Short-Term", "I want to die")], "", Vec::new())
        .unwrap();
    let entry = record.emergency.unwrap();
    assert_eq!(entry.initiator(), EmergencyInitiator::KeywordDetection);

    let log = parliament.emergency_log().unwrap();
    assert_eq!(log, vec![entry]);
    assert_eq!(parliament.status().unwrap().next_vote_mode, VoteMode::Emergency);

    let raw = fs::read_to_string(parliament.store().emergency_log_path()).unwrap();
    assert_eq!(raw.lines().count(), 1);
}

#[test]
fn failed_audit_append_leaves_state_unchanged() {
    let parliament = reigning();
    parliament.store().break_audit_log(true);

    assert!(parliament.trigger_emergency().is_err());
    assert!(
        parliament
            .record_session("daily", [("Ultimate", "I can't take it")], "", Vec::new())
            .is_err()
    );
    let status = parliament.status().unwrap();
    assert_eq!(status.next_vote_mode, VoteMode::Normal);
    assert_eq!(status.session_count, 0);
}

#[test]
fn transient_save_failure_is_retried_once() {
    let parliament = reigning();
    parliament.store().inject_save_failures(1);
    parliament.create_identity("Gardener", "").unwrap();

    parliament.store().inject_save_failures(2);
    assert!(parliament.create_identity("Explorer", "").is_err());
    let current = parliament.store().snapshot().unwrap();
    assert_eq!(current.reign.current().unwrap().name(), "Gardener");
}

#[test]
fn export_imports_into_an_empty_store_only() {
    let (dir, parliament) = file_backed();
    parliament.create_identity("Builder", "").unwrap();
    parliament.trigger_emergency().unwrap();
    parliament
        .propose_law("No phones at dinner", "standing", "Purpose", None)
        .unwrap();

    let bundle = parliament.export().unwrap();
    let json = serde_json::to_string_pretty(&bundle).unwrap();
    let restored: ExportBundle = serde_json::from_str(&json).unwrap();

    let target = Parliament::new(
        JsonFileStore::new(dir.path().join("restored")),
        ParliamentOptions::default(),
    );
    target.import(restored.clone()).unwrap();
    assert_eq!(target.state().unwrap(), bundle.state);
    assert_eq!(target.emergency_log().unwrap(), bundle.emergency_log);

    assert!(matches!(
        target.import(restored),
        Err(ParliamentError::State(StateError::AlreadyInitialized))
    ));
}

#[test]
fn import_rejects_newer_bundle_versions() {
    let parliament = reigning();
    let mut bundle = parliament.export().unwrap();
    bundle.format_version = 2;

    let target = Parliament::new(MemoryStore::new(), ParliamentOptions::default());
    assert!(target.import(bundle).is_err());
    assert!(!target.is_initialized().unwrap());
}

#[test]
fn failed_import_can_be_retried() {
    let source = reigning();
    source.trigger_emergency().unwrap();
    source.trigger_emergency().unwrap();
    let bundle = source.export().unwrap();
    assert_eq!(bundle.emergency_log.len(), 2);

    let target = Parliament::new(MemoryStore::new(), ParliamentOptions::default());
    target.store().inject_save_failures(2);
    assert!(matches!(
        target.import(bundle.clone()),
        Err(ParliamentError::Storage(StorageError::Write { .. }))
    ));
    assert!(!target.is_initialized().unwrap());
    assert_eq!(target.emergency_log().unwrap().len(), 2);

    target.import(bundle.clone()).unwrap();
    assert_eq!(target.state().unwrap(), bundle.state);
    assert_eq!(target.emergency_log().unwrap(), bundle.emergency_log);
}

#[test]
fn import_refuses_a_foreign_audit_log() {
    let source = reigning();
    source.trigger_emergency().unwrap();
    let bundle = source.export().unwrap();

    let target = Parliament::new(MemoryStore::new(), ParliamentOptions::default());
    target
        .log_emergency("unrelated", "", EmergencyInitiator::Manual)
        .unwrap();
    assert!(matches!(
        target.import(bundle),
        Err(ParliamentError::State(StateError::AlreadyInitialized))
    ));
    assert!(!target.is_initialized().unwrap());
}
