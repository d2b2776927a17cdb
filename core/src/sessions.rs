//! Session recording.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parliament_types::{DecisionId, Identity, ParliamentState, SeatKind, Session, SessionType};

use crate::error::{Result, StateError, ValidationError};
use crate::identity;

/// Resolve seat names to kinds. Blank statements are dropped.
fn resolve_statements<K, V>(
    statements: impl IntoIterator<Item = (K, V)>,
) -> Result<BTreeMap<SeatKind, String>, ValidationError>
where
    K: AsRef<str>,
    V: Into<String>,
{
    let mut resolved = BTreeMap::new();
    for (name, text) in statements {
        let name = name.as_ref();
        let kind =
            SeatKind::parse(name).ok_or_else(|| ValidationError::UnknownSeat(name.to_string()))?;
        let text: String = text.into();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if resolved.insert(kind, text.to_string()).is_some() {
            return Err(ValidationError::DuplicateStatement(kind.to_string()));
        }
    }
    Ok(resolved)
}

/// Record a session for the reigning identity and bump its session count.
///
/// Emergency scanning is the caller's job; see [`Session::full_text`].
pub fn record<K, V>(
    state: &mut ParliamentState,
    session_type: &str,
    statements: impl IntoIterator<Item = (K, V)>,
    final_policy: &str,
    decisions: Vec<DecisionId>,
    now: DateTime<Utc>,
) -> Result<Session>
where
    K: AsRef<str>,
    V: Into<String>,
{
    let reigning = state
        .reign
        .current()
        .map(Identity::id)
        .ok_or(StateError::NoActiveIdentity)?;
    let session_type: SessionType = session_type.parse().map_err(ValidationError::from)?;
    let statements = resolve_statements(statements)?;

    let id = state.ids.next_session();
    let session = Session::new(
        id,
        session_type,
        statements,
        final_policy.trim().to_string(),
        decisions,
        reigning,
        now,
    );
    let count = identity::session_recorded(state);
    tracing::info!(
        session = %id,
        session_type = %session_type,
        identity = %reigning,
        session_count = count.unwrap_or_default(),
        "Session recorded"
    );
    state.sessions.push(session.clone());
    Ok(session)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use parliament_types::{ParliamentState, SeatKind, SessionType};

    use super::record;
    use crate::error::{ParliamentError, StateError, ValidationError};
    use crate::identity;

    fn reigning_state() -> ParliamentState {
        let mut state = ParliamentState::new(Utc::now(), None);
        identity::create(&mut state, "Builder", "", Utc::now()).unwrap();
        state
    }

    #[test]
    fn session_needs_a_reigning_identity() {
        let mut state = ParliamentState::new(Utc::now(), None);
        let err = record(&mut state, "daily", [("Purpose", "x")], "", Vec::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, ParliamentError::State(StateError::NoActiveIdentity)));
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn session_increments_identity_count() {
        let mut state = reigning_state();
        let session = record(
            &mut state,
            "Weekly",
            [("Short-Term Bruce", "Rest."), ("ultimate", "  Call home. ")],
            "Call home on Sunday",
            Vec::new(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(session.session_type(), SessionType::Weekly);
        assert_eq!(session.statement(SeatKind::Ultimate), "Call home.");
        assert_eq!(session.statement(SeatKind::Purpose), "");
        assert_eq!(state.reign.current().unwrap().session_count(), 1);
        assert_eq!(state.sessions.len(), 1);
    }

    #[test]
    fn bad_type_unknown_seat_and_duplicates_are_rejected() {
        let mut state = reigning_state();
        let now = Utc::now();
        assert!(matches!(
            record(&mut state, "monthly", [("Purpose", "x")], "", Vec::new(), now),
            Err(ParliamentError::Validation(ValidationError::SessionType(_)))
        ));
        assert!(matches!(
            record(&mut state, "daily", [("Chancellor", "x")], "", Vec::new(), now),
            Err(ParliamentError::Validation(ValidationError::UnknownSeat(_)))
        ));
        assert!(matches!(
            record(&mut state, "daily", [("Purpose", "a"), ("purpose", "b")], "", Vec::new(), now),
            Err(ParliamentError::Validation(ValidationError::DuplicateStatement(_)))
        ));
        assert!(state.sessions.is_empty());
        assert_eq!(state.reign.current().unwrap().session_count(), 0);
    }
}
