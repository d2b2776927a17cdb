//! Acting identity lifecycle.
//!
//! At most one identity reigns. Creating a new one while another reigns
//! archives the old one abruptly (empty exit report); ending requires a
//! reigning identity. Archived identities are immutable history.

use chrono::{DateTime, Utc};
use parliament_types::{Identity, NonEmptyString, ParliamentState, Reign};

use crate::error::{Result, StateError, ValidationError};

fn archive(state: &mut ParliamentState, exit_report: &str, now: DateTime<Utc>) -> Option<Identity> {
    let archived = state.reign.vacate()?.archive(exit_report, now);
    state.identity_history.push(archived.clone());
    Some(archived)
}

/// Begin a new reign, archiving any current identity first.
pub fn create(
    state: &mut ParliamentState,
    name: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<Identity> {
    let name = NonEmptyString::new(name).map_err(ValidationError::empty("name"))?;

    if let Some(previous) = archive(state, "", now) {
        tracing::warn!(
            previous = previous.name(),
            previous_id = %previous.id(),
            "Identity replaced without an exit report"
        );
    }

    let id = state.ids.next_identity();
    let identity = Identity::begin(id, name, reason.trim(), now);
    tracing::info!(identity = %id, name = identity.name(), "Identity began reign");
    state.reign = Reign::Reigning(identity.clone());
    Ok(identity)
}

/// End the current reign with an exit report.
pub fn end(state: &mut ParliamentState, exit_report: &str, now: DateTime<Utc>) -> Result<Identity> {
    let archived = archive(state, exit_report.trim(), now).ok_or(StateError::NoActiveIdentity)?;
    tracing::info!(
        identity = %archived.id(),
        name = archived.name(),
        sessions = archived.session_count(),
        "Identity ended reign"
    );
    Ok(archived)
}

/// Graceful handover: end the current identity, then begin the next.
///
/// Validates the new name before touching the current reign.
pub fn rebirth(
    state: &mut ParliamentState,
    exit_report: &str,
    name: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<(Identity, Identity)> {
    NonEmptyString::new(name).map_err(ValidationError::empty("name"))?;
    let previous = end(state, exit_report, now)?;
    let next = create(state, name, reason, now)?;
    Ok((previous, next))
}

/// Count a session against the reigning identity. No-op when none reigns.
pub fn session_recorded(state: &mut ParliamentState) -> Option<u32> {
    state.reign.record_session()
}

/// Archived identities followed by the reigning one, ordered by start.
#[must_use]
pub fn timeline(state: &ParliamentState) -> Vec<Identity> {
    let mut all: Vec<Identity> = state
        .identity_history
        .iter()
        .chain(state.reign.current())
        .cloned()
        .collect();
    all.sort_by_key(|identity| (identity.started_at(), identity.id()));
    all
}

/// Check that at most one identity is unarchived and that it is the reigning one.
pub fn check_invariant(state: &ParliamentState) -> Result<(), StateError> {
    let open_in_history = state
        .identity_history
        .iter()
        .filter(|identity| !identity.is_archived())
        .count();
    let reigning_archived = state.reign.current().is_some_and(Identity::is_archived);
    if open_in_history > 0 || reigning_archived {
        return Err(StateError::MultipleReigning);
    }
    Ok(())
}
