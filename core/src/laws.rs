//! Law register.

use chrono::{DateTime, Utc};
use parliament_types::{
    Decision, DecisionId, Law, LawId, LawKind, LawStatus, NonEmptyString, ParliamentState,
};

use crate::error::{NotFoundError, Result, StateError, ValidationError};

/// Register a pending law.
pub fn propose(
    state: &mut ParliamentState,
    name: &str,
    kind: &str,
    proposer: &str,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<Law> {
    let name = NonEmptyString::new(name).map_err(ValidationError::empty("law name"))?;
    let kind: LawKind = kind.parse().map_err(ValidationError::from)?;
    let id = state.ids.next_law();
    let law = Law::propose(id, name, kind, proposer.trim(), expires_at, now);
    tracing::info!(law = %id, name = law.name(), kind = %kind, "Law proposed");
    state.laws.push(law.clone());
    Ok(law)
}

fn passed_decision(state: &ParliamentState, id: DecisionId) -> Result<&Decision> {
    let decision = state
        .decisions
        .iter()
        .find(|decision| decision.id() == id)
        .ok_or(NotFoundError::Decision(id))?;
    if !decision.passed() {
        return Err(StateError::DecisionNotPassed(id).into());
    }
    Ok(decision)
}

fn law_mut(state: &mut ParliamentState, id: LawId) -> Result<&mut Law> {
    Ok(state
        .laws
        .iter_mut()
        .find(|law| law.id() == id)
        .ok_or(NotFoundError::Law(id))?)
}

/// Enact a pending law on the strength of a passed decision.
pub fn pass(
    state: &mut ParliamentState,
    id: LawId,
    decision: DecisionId,
    now: DateTime<Utc>,
) -> Result<Law> {
    passed_decision(state, decision)?;
    let law = law_mut(state, id)?;
    law.pass(decision, now)?;
    tracing::info!(law = %id, decision = %decision, "Law passed");
    Ok(law.clone())
}

pub fn amend(
    state: &mut ParliamentState,
    id: LawId,
    amendment: &str,
    decision: DecisionId,
    now: DateTime<Utc>,
) -> Result<Law> {
    let amendment = NonEmptyString::new(amendment).map_err(ValidationError::empty("amendment"))?;
    passed_decision(state, decision)?;
    let law = law_mut(state, id)?;
    law.amend(amendment.into_inner(), decision, now)?;
    tracing::info!(law = %id, decision = %decision, "Law amended");
    Ok(law.clone())
}

pub fn repeal(state: &mut ParliamentState, id: LawId, reason: &str, now: DateTime<Utc>) -> Result<Law> {
    let law = law_mut(state, id)?;
    law.repeal(reason.trim(), now)?;
    tracing::info!(law = %id, "Law repealed");
    Ok(law.clone())
}

pub fn expire(state: &mut ParliamentState, id: LawId, now: DateTime<Utc>) -> Result<Law> {
    let law = law_mut(state, id)?;
    law.expire(now)?;
    tracing::info!(law = %id, "Law expired");
    Ok(law.clone())
}

/// Expire every active law whose expiry lies before `now`.
pub fn check_expiries(state: &mut ParliamentState, now: DateTime<Utc>) -> Vec<Law> {
    let mut expired = Vec::new();
    for law in &mut state.laws {
        if law.is_due_to_expire(now) && law.expire(now).is_ok() {
            tracing::info!(law = %law.id(), name = law.name(), "Law auto-expired");
            expired.push(law.clone());
        }
    }
    expired
}

#[must_use]
pub fn get(state: &ParliamentState, id: LawId) -> Option<&Law> {
    state.laws.iter().find(|law| law.id() == id)
}

/// Laws in proposal order, optionally restricted to one status.
#[must_use]
pub fn list(state: &ParliamentState, status: Option<LawStatus>) -> Vec<&Law> {
    state
        .laws
        .iter()
        .filter(|law| status.is_none_or(|wanted| law.status() == wanted))
        .collect()
}
