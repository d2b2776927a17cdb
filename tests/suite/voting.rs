//! Voting engine properties over every ballot the permanent seats can cast.

use parliament_core::voting::evaluate_permanent;
use parliament_core::{Admission, ParliamentError, StateError};
use parliament_types::{SeatKind, Vote, VoteMode, Voter};

use crate::common::{SEAT_NAMES, reigning};

const CHOICES: [&str; 3] = ["yes", "no", "abstain"];

/// All 3^6 assignments of yes/no/abstain to the six permanent seats.
fn every_ballot() -> Vec<Vec<(&'static str, &'static str)>> {
    let mut ballots = vec![Vec::new()];
    for seat in SEAT_NAMES {
        ballots = ballots
            .into_iter()
            .flat_map(|ballot| {
                CHOICES.iter().map(move |choice| {
                    let mut next = ballot.clone();
                    next.push((seat, *choice));
                    next
                })
            })
            .collect();
    }
    ballots
}

fn expected_yes(ballot: &[(&str, &str)], mode: VoteMode) -> u32 {
    ballot
        .iter()
        .filter(|(_, vote)| *vote == "yes")
        .filter_map(|(seat, _)| SeatKind::parse(seat))
        .map(|kind| kind.weight(mode))
        .sum()
}

#[test]
fn every_ballot_has_729_combinations() {
    assert_eq!(every_ballot().len(), 729);
}

#[test]
fn normal_mode_passes_exactly_at_threshold_and_never_vetoes() {
    for ballot in every_ballot() {
        let outcome = evaluate_permanent(ballot.iter().copied(), VoteMode::Normal);
        let yes = expected_yes(&ballot, VoteMode::Normal);
        assert_eq!(outcome.yes_weight, yes, "{ballot:?}");
        assert_eq!(outcome.passed, yes >= 10, "{ballot:?}");
        assert!(!outcome.veto_triggered, "{ballot:?}");
        assert_eq!(
            outcome.yes_weight + outcome.no_weight + outcome.abstain_weight,
            18
        );
    }
}

#[test]
fn emergency_mode_applies_ultimate_veto() {
    for ballot in every_ballot() {
        let outcome = evaluate_permanent(ballot.iter().copied(), VoteMode::Emergency);
        let yes = expected_yes(&ballot, VoteMode::Emergency);
        let ultimate_no = ballot.contains(&("Ultimate", "no"));
        assert_eq!(outcome.yes_weight, yes, "{ballot:?}");
        assert_eq!(outcome.veto_triggered, ultimate_no, "{ballot:?}");
        assert_eq!(outcome.passed, yes >= 12 && !ultimate_no, "{ballot:?}");
        // Short-Term is barred, Long-Term doubled: 0+2+6+4+5+3.
        assert_eq!(
            outcome.yes_weight + outcome.no_weight + outcome.abstain_weight,
            20
        );
    }
}

#[test]
fn long_term_and_purpose_alone_cannot_pass_either_mode() {
    let ballot = [("Long-Term", "yes"), ("Purpose", "yes")];
    assert!(!evaluate_permanent(ballot, VoteMode::Normal).passed);
    assert!(!evaluate_permanent(ballot, VoteMode::Emergency).passed);
}

#[test]
fn unknown_and_duplicate_seats_weigh_nothing() {
    let outcome = evaluate_permanent(
        [
            ("Purpose", "yes"),
            ("purpose bruce", "yes"),
            ("Chancellor", "yes"),
        ],
        VoteMode::Normal,
    );
    assert_eq!(outcome.yes_weight, 4);
    let voters: Vec<Voter> = outcome.breakdown.iter().map(|line| line.voter).collect();
    assert_eq!(voters, vec![
        Voter::Seat(SeatKind::Purpose),
        Voter::Duplicate,
        Voter::Unrecognized
    ]);
}

#[test]
fn deactivated_ultimate_still_vetoes() {
    let parliament = reigning();
    parliament.trigger_emergency().unwrap();
    parliament.set_seat_active("Ultimate", false).unwrap();

    let outcome = parliament
        .preview_vote([("Ultimate", "no"), ("Long-Term", "yes"), ("Purpose", "yes"), ("Mid-Term", "yes")])
        .unwrap();
    assert_eq!(outcome.mode, VoteMode::Emergency);
    assert_eq!(outcome.breakdown[0].weight, 0);
    assert!(outcome.veto_triggered);
    assert!(!outcome.passed);
}

#[test]
fn repeated_seat_keeps_its_first_vote_in_the_record() {
    let parliament = reigning();
    let decision = parliament
        .cast_vote("Adopt a dog", Vec::new(), [("Ultimate", "yes"), ("Ultimate", "no")])
        .unwrap();

    assert_eq!(decision.weighted_result(), 5);
    assert_eq!(decision.votes().len(), 1);
    assert_eq!(decision.votes().get("Ultimate"), Some(&Vote::Yes));
    assert_eq!(decision.breakdown()[1].voter, Voter::Duplicate);
}

#[test]
fn custom_seat_counts_in_normal_mode_only() {
    let parliament = reigning();
    parliament
        .admit_custom_seat(Admission {
            name: "Health Advocate".to_string(),
            weight: 2,
            ..Admission::default()
        })
        .unwrap();

    let ballot = [("Purpose", "yes"), ("Long-Term", "yes"), ("Health Advocate", "yes")];
    let normal = parliament.evaluate_vote(ballot, VoteMode::Normal).unwrap();
    assert_eq!(normal.yes_weight, 9);
    let emergency = parliament.evaluate_vote(ballot, VoteMode::Emergency).unwrap();
    assert_eq!(emergency.yes_weight, 10);
    assert_eq!(emergency.breakdown[2].weight, 0);
}

#[test]
fn emergency_mode_applies_to_one_vote_only() {
    let parliament = reigning();
    let record = parliament
        .record_session(
            "daily",
            [("Short-Term", "Some days I feel like I can't go on")],
            "Call a friend",
            Vec::new(),
        )
        .unwrap();
    assert!(record.emergency.is_some());

    let first = parliament
        .cast_vote("Quit job", Vec::new(), [("Short-Term", "yes"), ("Ultimate", "no")])
        .unwrap();
    assert_eq!(first.mode(), VoteMode::Emergency);
    assert!(first.veto_triggered());
    assert!(!first.passed());

    let second = parliament
        .cast_vote("Quit job", Vec::new(), [("Short-Term", "yes"), ("Ultimate", "no")])
        .unwrap();
    assert_eq!(second.mode(), VoteMode::Normal);
    assert!(!second.veto_triggered());
    assert_eq!(second.votes().get("Short-Term"), Some(&Vote::Yes));
}

#[test]
fn vote_without_identity_is_refused_and_keeps_latch() {
    let parliament = reigning();
    parliament.trigger_emergency().unwrap();
    parliament.end_identity("Done").unwrap();

    let err = parliament
        .cast_vote("Anything", Vec::new(), [("Purpose", "yes")])
        .unwrap_err();
    assert!(matches!(err, ParliamentError::State(StateError::NoActiveIdentity)));
    assert_eq!(parliament.status().unwrap().next_vote_mode, VoteMode::Emergency);
}
