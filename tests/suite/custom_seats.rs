use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use parliament_core::{
    Admission, CapacityError, Parliament, ParliamentError, ParliamentOptions, ValidationError,
};
use parliament_store::MemoryStore;
use parliament_types::{ExpiryCondition, RetirementReason};

use crate::common::{fixed_now, reigning};

fn admission(name: &str, weight: u32) -> Admission {
    Admission {
        name: name.to_string(),
        weight,
        ..Admission::default()
    }
}

static DAYS_ELAPSED: AtomicI64 = AtomicI64::new(0);

fn stepped_clock() -> DateTime<Utc> {
    fixed_now() + TimeDelta::days(DAYS_ELAPSED.load(Ordering::SeqCst))
}

#[test]
fn capacity_limits_are_enforced() {
    let parliament = reigning();
    parliament.admit_custom_seat(admission("Coach", 2)).unwrap();

    assert!(matches!(
        parliament.admit_custom_seat(admission("Mentor", 2)),
        Err(ParliamentError::Capacity(CapacityError::CombinedWeight { requested: 4, max: 3 }))
    ));
    parliament.admit_custom_seat(admission("Mentor", 1)).unwrap();
    assert!(matches!(
        parliament.admit_custom_seat(admission("Critic", 1)),
        Err(ParliamentError::Capacity(CapacityError::TooManySeats { max: 2 }))
    ));
    assert_eq!(parliament.list_custom_seats(false).unwrap().len(), 2);
}

#[test]
fn dismissal_frees_capacity_and_keeps_history() {
    let parliament = reigning();
    let coach = parliament.admit_custom_seat(admission("Coach", 3)).unwrap();

    assert!(parliament.dismiss_custom_seat("coach", "Season over").unwrap());
    assert!(!parliament.dismiss_custom_seat("coach", "Again").unwrap());
    parliament.admit_custom_seat(admission("Mentor", 3)).unwrap();

    let all = parliament.list_custom_seats(true).unwrap();
    assert_eq!(all.len(), 2);
    let retired = parliament
        .custom_seat(&coach.id().to_string())
        .unwrap()
        .unwrap();
    assert!(!retired.is_active());
    assert_eq!(
        retired.retirement().map(|r| &r.reason),
        Some(&RetirementReason::Dismissed("Season over".to_string()))
    );
}

#[test]
fn time_based_seat_expires_after_its_day_count() {
    let parliament = Parliament::new(MemoryStore::new(), ParliamentOptions::default())
        .with_clock(stepped_clock);
    parliament.init(None).unwrap();
    parliament
        .admit_custom_seat(Admission {
            expiry: "time-based".to_string(),
            expiry_value: "30".to_string(),
            ..admission("Trainer", 1)
        })
        .unwrap();

    DAYS_ELAPSED.store(29, Ordering::SeqCst);
    assert!(parliament.check_custom_expiries().unwrap().is_empty());

    assert!(parliament.extend_custom_seat("Trainer", "45").unwrap());
    DAYS_ELAPSED.store(44, Ordering::SeqCst);
    assert!(parliament.check_custom_expiries().unwrap().is_empty());

    DAYS_ELAPSED.store(45, Ordering::SeqCst);
    let expired = parliament.check_custom_expiries().unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].expiry(), ExpiryCondition::TimeBased);
    assert!(parliament.list_custom_seats(false).unwrap().is_empty());
    assert!(parliament.check_custom_expiries().unwrap().is_empty());
}

#[test]
fn manual_and_event_based_seats_never_auto_expire() {
    let parliament = reigning();
    parliament.admit_custom_seat(admission("Coach", 1)).unwrap();
    parliament
        .admit_custom_seat(Admission {
            expiry: "event-based".to_string(),
            expiry_value: "Marathon finished".to_string(),
            ..admission("Runner", 1)
        })
        .unwrap();
    assert!(parliament.check_custom_expiries().unwrap().is_empty());
    assert_eq!(parliament.list_custom_seats(false).unwrap().len(), 2);
}

#[test]
fn retired_seat_name_is_unrecognized_in_votes() {
    let parliament = reigning();
    parliament.admit_custom_seat(admission("Coach", 3)).unwrap();
    parliament.dismiss_custom_seat("Coach", "").unwrap();

    let outcome = parliament.preview_vote([("Coach", "yes")]).unwrap();
    assert_eq!(outcome.yes_weight, 0);
}

#[test]
fn seat_names_must_be_unique_across_the_chamber() {
    let parliament = reigning();
    assert!(matches!(
        parliament.admit_custom_seat(admission("Purpose", 2)),
        Err(ParliamentError::Validation(ValidationError::ReservedSeatName(_)))
    ));

    parliament.admit_custom_seat(admission("Coach", 1)).unwrap();
    assert!(matches!(
        parliament.admit_custom_seat(admission("coach", 2)),
        Err(ParliamentError::Validation(ValidationError::SeatNameTaken(_)))
    ));
    assert_eq!(parliament.list_custom_seats(false).unwrap().len(), 1);

    let outcome = parliament.preview_vote([("Coach", "yes")]).unwrap();
    assert_eq!(outcome.yes_weight, 1);
}

#[test]
fn negative_time_based_value_is_refused() {
    let parliament = reigning();
    let err = parliament
        .admit_custom_seat(Admission {
            expiry: "time-based".to_string(),
            expiry_value: "-3".to_string(),
            ..admission("Trainer", 1)
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ParliamentError::Validation(ValidationError::NegativeExpiryDays(-3))
    ));
    assert!(parliament.list_custom_seats(true).unwrap().is_empty());
}
