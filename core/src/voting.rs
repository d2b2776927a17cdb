//! Weighted voting.
//!
//! A ballot maps seat names to free-text votes. Each name is resolved to a
//! permanent seat, an active custom seat, or nothing; the resolved weight is
//! added to the yes, no or abstain total. Normal mode passes at 10. Emergency
//! mode swaps in the emergency weight table, raises the bar to 12, and gives
//! the Ultimate seat a veto.

use std::collections::BTreeSet;
use std::mem;

use chrono::{DateTime, Utc};
use parliament_types::{
    BallotLine, CustomSeat, CustomSeatId, Decision, Identity, NonEmptyString, ParliamentState,
    Seat, SeatKind, Vote, VoteMode, VoteOutcome, Voter,
};

use crate::error::{Result, StateError, ValidationError};
use crate::registry::seat_weight;

/// Options recorded when a vote is cast without any.
pub const DEFAULT_OPTIONS: [&str; 2] = ["yes", "no"];

/// The seats that can vote, borrowed from wherever they live.
#[derive(Debug, Clone, Copy)]
pub struct Chamber<'a> {
    seats: &'a [Seat],
    custom_seats: &'a [CustomSeat],
}

impl<'a> Chamber<'a> {
    #[must_use]
    pub fn new(seats: &'a [Seat], custom_seats: &'a [CustomSeat]) -> Self {
        Self {
            seats,
            custom_seats,
        }
    }

    #[must_use]
    pub fn of(state: &'a ParliamentState) -> Self {
        Self::new(&state.seats, &state.custom_seats)
    }

    fn active_custom_named(&self, name: &str) -> Option<&'a CustomSeat> {
        self.custom_seats
            .iter()
            .find(|seat| seat.is_active() && seat.is_named(name))
    }
}

#[derive(Default)]
struct Seen {
    seats: BTreeSet<SeatKind>,
    custom: BTreeSet<CustomSeatId>,
}

fn resolve(chamber: &Chamber<'_>, name: &str, mode: VoteMode, seen: &mut Seen) -> (Voter, u32) {
    if let Some(kind) = SeatKind::parse(name) {
        if !seen.seats.insert(kind) {
            tracing::warn!(seat = name, %kind, "Seat voted twice; later ballot ignored");
            return (Voter::Duplicate, 0);
        }
        return (Voter::Seat(kind), seat_weight(chamber.seats, kind, mode));
    }

    if let Some(custom) = chamber.active_custom_named(name) {
        if !seen.custom.insert(custom.id()) {
            tracing::warn!(seat = name, "Custom seat voted twice; later ballot ignored");
            return (Voter::Duplicate, 0);
        }
        // Emergency weights are a fixed table; custom seats sit it out.
        let weight = match mode {
            VoteMode::Normal => custom.weight(),
            VoteMode::Emergency => 0,
        };
        return (Voter::Custom(custom.id()), weight);
    }

    tracing::warn!(seat = name, "Unrecognized seat in vote; counted with weight 0");
    (Voter::Unrecognized, 0)
}

/// Tally `votes` against `chamber` under `mode`.
///
/// Seats are never mutated. Unknown names appear in the breakdown with weight 0.
pub fn evaluate<K, V>(
    chamber: &Chamber<'_>,
    votes: impl IntoIterator<Item = (K, V)>,
    mode: VoteMode,
) -> VoteOutcome
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut seen = Seen::default();
    let mut outcome = VoteOutcome {
        mode,
        yes_weight: 0,
        no_weight: 0,
        abstain_weight: 0,
        passed: false,
        veto_triggered: false,
        breakdown: Vec::new(),
    };

    for (name, raw_vote) in votes {
        let name = name.as_ref();
        let vote = Vote::parse(raw_vote.as_ref());
        let (voter, weight) = resolve(chamber, name, mode, &mut seen);

        match vote {
            Vote::Yes => outcome.yes_weight += weight,
            Vote::No => outcome.no_weight += weight,
            Vote::Abstain => outcome.abstain_weight += weight,
        }
        // Holds even when Ultimate is deactivated and weighs 0.
        if mode.is_emergency() && voter == Voter::Seat(SeatKind::Ultimate) && vote == Vote::No {
            outcome.veto_triggered = true;
        }

        outcome.breakdown.push(BallotLine {
            seat: name.to_string(),
            voter,
            vote,
            weight,
        });
    }

    outcome.passed = outcome.yes_weight >= mode.threshold() && !outcome.veto_triggered;
    tracing::debug!(
        mode = mode.as_str(),
        yes = outcome.yes_weight,
        no = outcome.no_weight,
        abstain = outcome.abstain_weight,
        passed = outcome.passed,
        veto = outcome.veto_triggered,
        "Vote evaluated"
    );
    outcome
}

/// Tally against the full permanent registry with no custom seats.
pub fn evaluate_permanent<K, V>(
    votes: impl IntoIterator<Item = (K, V)>,
    mode: VoteMode,
) -> VoteOutcome
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let seats = Seat::registry();
    evaluate(&Chamber::new(&seats, &[]), votes, mode)
}

/// What the next vote would return, without consuming the emergency latch.
pub fn preview<K, V>(state: &ParliamentState, votes: impl IntoIterator<Item = (K, V)>) -> VoteOutcome
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    evaluate(&Chamber::of(state), votes, state.next_vote_mode)
}

/// Evaluate and record a decision.
///
/// Needs a reigning identity. Consumes the emergency latch: the mode armed by
/// emergency detection applies to this vote only.
pub fn cast_vote<K, V>(
    state: &mut ParliamentState,
    topic: &str,
    options: Vec<String>,
    votes: impl IntoIterator<Item = (K, V)>,
    now: DateTime<Utc>,
) -> Result<Decision>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let topic = NonEmptyString::new(topic).map_err(ValidationError::empty("topic"))?;
    let identity = state
        .reign
        .current()
        .map(Identity::id)
        .ok_or(StateError::NoActiveIdentity)?;

    let options = if options.iter().all(|option| option.trim().is_empty()) {
        DEFAULT_OPTIONS.iter().map(ToString::to_string).collect()
    } else {
        options
    };

    let outcome = evaluate(&Chamber::of(state), votes, state.next_vote_mode);
    let mode = mem::take(&mut state.next_vote_mode);

    let id = state.ids.next_decision();
    let decision = Decision::record(id, topic.into_inner(), options, outcome, identity, now);
    tracing::info!(
        decision = %id,
        mode = mode.as_str(),
        passed = decision.passed(),
        veto = decision.veto_triggered(),
        weighted_result = decision.weighted_result(),
        "Decision recorded"
    );
    state.decisions.push(decision.clone());
    Ok(decision)
}
