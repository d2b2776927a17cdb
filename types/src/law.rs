//! Laws passed by the parliament.
//!
//! A law starts `Pending`, becomes `Active` once a passing decision backs it,
//! and ends either `Repealed` or `Expired`. Every transition appends a
//! [`LawEvent`]; history is never rewritten.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NonEmptyString;
use crate::ids::{DecisionId, LawId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LawKind {
    #[default]
    Standing,
    Temporary,
}

impl LawKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LawKind::Standing => "standing",
            LawKind::Temporary => "temporary",
        }
    }
}

impl fmt::Display for LawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown law kind: {0} (expected standing or temporary)")]
pub struct LawKindParseError(pub String);

impl FromStr for LawKind {
    type Err = LawKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "standing" => Ok(LawKind::Standing),
            "temporary" | "temp" => Ok(LawKind::Temporary),
            other => Err(LawKindParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LawStatus {
    Pending,
    Active,
    Repealed,
    Expired,
}

impl LawStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LawStatus::Pending => "Pending",
            LawStatus::Active => "Active",
            LawStatus::Repealed => "Repealed",
            LawStatus::Expired => "Expired",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, LawStatus::Repealed | LawStatus::Expired)
    }
}

impl fmt::Display for LawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum LawAction {
    Passed { decision: DecisionId },
    Amended { decision: DecisionId, amendment: String },
    Repealed { reason: String },
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub action: LawAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid law transition from {from} to {to}")]
pub struct LawTransitionError {
    pub from: LawStatus,
    pub to: LawStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Law {
    id: LawId,
    name: NonEmptyString,
    kind: LawKind,
    proposer: String,
    created_at: DateTime<Utc>,
    status: LawStatus,
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    history: Vec<LawEvent>,
}

impl Law {
    #[must_use]
    pub fn propose(
        id: LawId,
        name: NonEmptyString,
        kind: LawKind,
        proposer: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            proposer: proposer.into(),
            created_at: now,
            status: LawStatus::Pending,
            expires_at,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> LawId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn kind(&self) -> LawKind {
        self.kind
    }

    #[must_use]
    pub fn proposer(&self) -> &str {
        &self.proposer
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn status(&self) -> LawStatus {
        self.status
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    #[must_use]
    pub fn history(&self) -> &[LawEvent] {
        &self.history
    }

    /// True when the law is active and its expiry lies strictly before `now`.
    #[must_use]
    pub fn is_due_to_expire(&self, now: DateTime<Utc>) -> bool {
        self.status == LawStatus::Active && self.expires_at.is_some_and(|at| at < now)
    }

    fn transition(
        &mut self,
        allowed: &[LawStatus],
        to: LawStatus,
        action: LawAction,
        now: DateTime<Utc>,
    ) -> Result<(), LawTransitionError> {
        if !allowed.contains(&self.status) {
            return Err(LawTransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.history.push(LawEvent { at: now, action });
        Ok(())
    }

    /// Pending → Active.
    pub fn pass(&mut self, decision: DecisionId, now: DateTime<Utc>) -> Result<(), LawTransitionError> {
        self.transition(
            &[LawStatus::Pending],
            LawStatus::Active,
            LawAction::Passed { decision },
            now,
        )
    }

    /// Records an amendment. Only active laws can be amended.
    pub fn amend(
        &mut self,
        amendment: impl Into<String>,
        decision: DecisionId,
        now: DateTime<Utc>,
    ) -> Result<(), LawTransitionError> {
        self.transition(
            &[LawStatus::Active],
            LawStatus::Active,
            LawAction::Amended {
                decision,
                amendment: amendment.into(),
            },
            now,
        )
    }

    pub fn repeal(
        &mut self,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), LawTransitionError> {
        self.transition(
            &[LawStatus::Pending, LawStatus::Active],
            LawStatus::Repealed,
            LawAction::Repealed {
                reason: reason.into(),
            },
            now,
        )
    }

    pub fn expire(&mut self, now: DateTime<Utc>) -> Result<(), LawTransitionError> {
        self.transition(&[LawStatus::Active], LawStatus::Expired, LawAction::Expired, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};

    use super::{Law, LawAction, LawKind, LawStatus};
    use crate::NonEmptyString;
    use crate::ids::{DecisionId, LawId};

    fn law() -> Law {
        Law::propose(
            LawId::new(1),
            NonEmptyString::new("No screens after midnight").unwrap(),
            LawKind::Temporary,
            "Parliament",
            Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn full_lifecycle_appends_history() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let mut law = law();
        law.pass(DecisionId::new(3), now).unwrap();
        law.amend("weekends excepted", DecisionId::new(4), now).unwrap();
        law.repeal("no longer needed", now).unwrap();
        assert_eq!(law.status(), LawStatus::Repealed);
        assert_eq!(law.history().len(), 3);
        assert_eq!(
            law.history()[0].action,
            LawAction::Passed {
                decision: DecisionId::new(3)
            }
        );
    }

    #[test]
    fn cannot_amend_pending_or_expire_repealed() {
        let now = Utc::now();
        let mut law = law();
        let err = law.amend("x", DecisionId::new(1), now).unwrap_err();
        assert_eq!(err.from, LawStatus::Pending);
        law.repeal("", now).unwrap();
        assert!(law.expire(now).is_err());
        assert!(law.pass(DecisionId::new(1), now).is_err());
        assert_eq!(law.history().len(), 1);
    }

    #[test]
    fn due_to_expire_only_when_active_and_past() {
        let mut law = law();
        let expiry = law.expires_at().unwrap();
        assert!(!law.is_due_to_expire(expiry + TimeDelta::days(1)));
        law.pass(DecisionId::new(1), expiry).unwrap();
        assert!(!law.is_due_to_expire(expiry));
        assert!(law.is_due_to_expire(expiry + TimeDelta::seconds(1)));
    }

    #[test]
    fn kind_parses() {
        assert_eq!("Temporary".parse::<LawKind>(), Ok(LawKind::Temporary));
        assert_eq!("".parse::<LawKind>(), Ok(LawKind::Standing));
        assert!("eternal".parse::<LawKind>().is_err());
    }
}
