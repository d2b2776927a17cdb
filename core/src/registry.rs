//! Seat registry: the permanent seats and their weights.

use parliament_types::{ParliamentState, Seat, SeatKind, VoteMode};

use crate::error::NotFoundError;

/// Weight `name` carries under `mode`, looked up in `seats`.
///
/// Unknown names and deactivated seats weigh 0.
#[must_use]
pub fn weight_of(seats: &[Seat], name: &str, mode: VoteMode) -> u32 {
    SeatKind::parse(name).map_or(0, |kind| seat_weight(seats, kind, mode))
}

/// Weight of a known seat. A seat missing from `seats` or deactivated weighs 0.
#[must_use]
pub fn seat_weight(seats: &[Seat], kind: SeatKind, mode: VoteMode) -> u32 {
    seats
        .iter()
        .find(|seat| seat.kind() == kind)
        .filter(|seat| seat.is_active())
        .map_or(0, |_| kind.weight(mode))
}

/// Activate or deactivate a permanent seat. Seats are never removed.
pub fn set_seat_active(
    state: &mut ParliamentState,
    name: &str,
    active: bool,
) -> Result<SeatKind, NotFoundError> {
    let kind = SeatKind::parse(name).ok_or_else(|| NotFoundError::Seat(name.to_string()))?;
    let seat = state
        .seat_mut(kind)
        .ok_or_else(|| NotFoundError::Seat(name.to_string()))?;
    if seat.is_active() != active {
        seat.set_active(active);
        tracing::info!(seat = %kind, active, "Seat activation changed");
    }
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use parliament_types::{ParliamentState, Seat, SeatKind, VoteMode};

    use super::{set_seat_active, weight_of};
    use crate::error::NotFoundError;

    #[test]
    fn weight_lookup_by_any_spelling() {
        let seats = Seat::registry();
        assert_eq!(weight_of(&seats, "Long-Term Bruce", VoteMode::Normal), 3);
        assert_eq!(weight_of(&seats, "long_term", VoteMode::Emergency), 6);
        assert_eq!(weight_of(&seats, "Short-Term", VoteMode::Emergency), 0);
    }

    #[test]
    fn unknown_seat_weighs_nothing() {
        let seats = Seat::registry();
        assert_eq!(weight_of(&seats, "Chancellor", VoteMode::Normal), 0);
    }

    #[test]
    fn deactivated_seat_weighs_nothing_but_stays_registered() {
        let mut state = ParliamentState::new(Utc::now(), None);
        set_seat_active(&mut state, "purpose", false).unwrap();
        assert_eq!(weight_of(&state.seats, "Purpose", VoteMode::Normal), 0);
        assert_eq!(state.seats.len(), 6);
        assert!(!state.seat(SeatKind::Purpose).unwrap().is_active());

        set_seat_active(&mut state, "Purpose", true).unwrap();
        assert_eq!(weight_of(&state.seats, "Purpose", VoteMode::Normal), 4);
    }

    #[test]
    fn toggling_unknown_seat_is_not_found() {
        let mut state = ParliamentState::new(Utc::now(), None);
        assert_eq!(
            set_seat_active(&mut state, "Chancellor", false),
            Err(NotFoundError::Seat("Chancellor".to_string()))
        );
    }
}
