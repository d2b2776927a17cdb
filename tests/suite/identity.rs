use parliament_core::{ParliamentError, StateError, ValidationError};

use crate::common::reigning;

#[test]
fn reign_end_and_rebirth_build_a_timeline() {
    let parliament = reigning();
    parliament
        .record_session("daily", [("Purpose", "Ship it")], "Ship on Friday", Vec::new())
        .unwrap();

    let (previous, next) = parliament
        .rebirth("Learned to ship", "Gardener", "Slower season")
        .unwrap();
    assert_eq!(previous.name(), "Builder");
    assert_eq!(previous.exit_report(), Some("Learned to ship"));
    assert_eq!(previous.session_count(), 1);
    assert!(previous.is_archived());
    assert_eq!(next.name(), "Gardener");
    assert_eq!(next.session_count(), 0);

    let timeline = parliament.timeline().unwrap();
    let names: Vec<&str> = timeline.iter().map(|identity| identity.name()).collect();
    assert_eq!(names, vec!["Builder", "Gardener"]);
    assert_eq!(timeline.iter().filter(|i| !i.is_archived()).count(), 1);
}

#[test]
fn creating_over_a_reign_archives_without_report() {
    let parliament = reigning();
    let next = parliament.create_identity("Explorer", "").unwrap();

    assert_eq!(parliament.current_identity().unwrap(), Some(next));
    let timeline = parliament.timeline().unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].exit_report(), Some(""));
    assert!(timeline[0].ended_at().is_some());
}

#[test]
fn ending_twice_is_refused() {
    let parliament = reigning();
    parliament.end_identity("Done").unwrap();
    assert!(matches!(
        parliament.end_identity("Again"),
        Err(ParliamentError::State(StateError::NoActiveIdentity))
    ));
    assert!(parliament.current_identity().unwrap().is_none());
}

#[test]
fn rebirth_with_blank_name_keeps_current_reign() {
    let parliament = reigning();
    assert!(matches!(
        parliament.rebirth("Done", "   ", ""),
        Err(ParliamentError::Validation(ValidationError::Empty { field: "name" }))
    ));
    let current = parliament.current_identity().unwrap().unwrap();
    assert_eq!(current.name(), "Builder");
    assert!(!current.is_archived());
}

#[test]
fn sessions_need_an_identity() {
    let parliament = reigning();
    parliament.end_identity("").unwrap();
    assert!(matches!(
        parliament.record_session("weekly", [("Ultimate", "Rest")], "", Vec::new()),
        Err(ParliamentError::State(StateError::NoActiveIdentity))
    ));
    assert!(parliament.recent_sessions(10).unwrap().is_empty());
}
