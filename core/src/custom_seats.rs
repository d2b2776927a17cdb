//! Custom seat controller.
//!
//! Admits temporary seats under two caps (count and combined weight), retires
//! them on request or once a time-based expiry has elapsed.

use chrono::{DateTime, Utc};
use parliament_types::{
    CustomSeat, CustomSeatProfile, CustomSeatSpec, ExpiryCondition, MAX_ACTIVE_CUSTOM_SEATS,
    MAX_COMBINED_CUSTOM_WEIGHT, NonEmptyString, ParliamentState, RetirementReason, SeatKind,
};

use crate::error::{CapacityError, NotFoundError, Result, ValidationError};

/// Unvalidated admission request, as it arrives from a prompt or command line.
#[derive(Debug, Clone, Default)]
pub struct Admission {
    pub name: String,
    pub weight: u32,
    /// `manual`, `time-based` or `event-based`; empty means manual.
    pub expiry: String,
    pub expiry_value: String,
    pub profile: CustomSeatProfile,
}

impl Admission {
    pub fn validate(self) -> Result<CustomSeatSpec, ValidationError> {
        let name = NonEmptyString::new(self.name).map_err(ValidationError::empty("name"))?;
        if SeatKind::parse(name.as_str()).is_some() {
            return Err(ValidationError::ReservedSeatName(name.into_inner()));
        }
        if self.weight == 0 {
            return Err(ValidationError::ZeroWeight);
        }
        let expiry: ExpiryCondition = self.expiry.parse()?;
        let expiry_value = self.expiry_value.trim().to_string();
        // Non-numeric time-based values are kept; such seats never auto-expire.
        if expiry == ExpiryCondition::TimeBased
            && let Ok(days) = expiry_value.parse::<i64>()
            && days < 0
        {
            return Err(ValidationError::NegativeExpiryDays(days));
        }
        Ok(CustomSeatSpec {
            name,
            weight: self.weight,
            expiry,
            expiry_value,
            profile: self.profile,
        })
    }
}

pub fn active(state: &ParliamentState) -> impl Iterator<Item = &CustomSeat> {
    state.custom_seats.iter().filter(|seat| seat.is_active())
}

#[must_use]
pub fn active_weight(state: &ParliamentState) -> u32 {
    active(state).map(CustomSeat::weight).sum()
}

/// Check both caps for a seat of `weight` joining the active ones.
pub fn check_capacity(state: &ParliamentState, weight: u32) -> Result<(), CapacityError> {
    if active(state).count() >= MAX_ACTIVE_CUSTOM_SEATS {
        return Err(CapacityError::TooManySeats {
            max: MAX_ACTIVE_CUSTOM_SEATS,
        });
    }
    let requested = active_weight(state).saturating_add(weight);
    if requested > MAX_COMBINED_CUSTOM_WEIGHT {
        return Err(CapacityError::CombinedWeight {
            requested,
            max: MAX_COMBINED_CUSTOM_WEIGHT,
        });
    }
    Ok(())
}

pub fn admit(
    state: &mut ParliamentState,
    admission: Admission,
    now: DateTime<Utc>,
) -> Result<CustomSeat> {
    let spec = admission.validate()?;
    if active(state).any(|seat| seat.is_named(spec.name.as_str())) {
        return Err(ValidationError::SeatNameTaken(spec.name.into_inner()).into());
    }
    check_capacity(state, spec.weight)?;

    let id = state.ids.next_custom_seat();
    let seat = CustomSeat::convene(id, spec, now);
    tracing::info!(
        seat = %id,
        name = seat.name(),
        weight = seat.weight(),
        expiry = seat.expiry().as_str(),
        "Custom seat admitted"
    );
    state.custom_seats.push(seat.clone());
    Ok(seat)
}

fn find_active_mut<'a>(state: &'a mut ParliamentState, id_or_name: &str) -> Option<&'a mut CustomSeat> {
    state
        .custom_seats
        .iter_mut()
        .find(|seat| seat.is_active() && seat.answers_to(id_or_name))
}

/// Retire an active seat by id or name. `false` when nothing active matches.
pub fn dismiss(
    state: &mut ParliamentState,
    id_or_name: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> bool {
    let Some(seat) = find_active_mut(state, id_or_name) else {
        tracing::info!(seat = id_or_name, "{}", NotFoundError::CustomSeat(id_or_name.to_string()));
        return false;
    };
    let retired = seat.retire(RetirementReason::Dismissed(reason.trim().to_string()), now);
    if retired {
        tracing::info!(seat = %seat.id(), name = seat.name(), "Custom seat dismissed");
    }
    retired
}

/// Replace the expiry value of an active seat. `false` when nothing active matches.
pub fn extend(state: &mut ParliamentState, id_or_name: &str, new_value: &str) -> bool {
    let Some(seat) = find_active_mut(state, id_or_name) else {
        tracing::info!(seat = id_or_name, "{}", NotFoundError::CustomSeat(id_or_name.to_string()));
        return false;
    };
    seat.set_expiry_value(new_value.trim().to_string());
    tracing::info!(
        seat = %seat.id(),
        expiry_value = seat.expiry_value(),
        "Custom seat expiry extended"
    );
    true
}

/// True when a time-based seat has been seated for at least its day count.
#[must_use]
pub fn is_expired(seat: &CustomSeat, now: DateTime<Utc>) -> bool {
    match (seat.auto_expiry_days(), seat.age_in_days(now)) {
        (Some(limit), Some(age)) => age >= limit,
        _ => false,
    }
}

/// Retire every active time-based seat whose day count has elapsed.
///
/// Returns the seats retired by this call.
pub fn check_expiries(state: &mut ParliamentState, now: DateTime<Utc>) -> Vec<CustomSeat> {
    let mut expired = Vec::new();
    for seat in &mut state.custom_seats {
        if seat.is_active() && is_expired(seat, now) && seat.retire(RetirementReason::AutoExpired, now)
        {
            tracing::info!(seat = %seat.id(), name = seat.name(), "Custom seat auto-expired");
            expired.push(seat.clone());
        }
    }
    expired
}

#[must_use]
pub fn get<'a>(state: &'a ParliamentState, id_or_name: &str) -> Option<&'a CustomSeat> {
    state
        .custom_seats
        .iter()
        .find(|seat| seat.answers_to(id_or_name))
}
