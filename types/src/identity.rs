//! The acting identity and its reign.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::NonEmptyString;
use crate::ids::IdentityId;

/// An executive persona.
///
/// While reigning, `ended_at` and `exit_report` are `None`. Archiving sets
/// both and the record never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: IdentityId,
    name: NonEmptyString,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    reason: String,
    exit_report: Option<String>,
    session_count: u32,
}

impl Identity {
    #[must_use]
    pub fn begin(
        id: IdentityId,
        name: NonEmptyString,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            started_at: now,
            ended_at: None,
            reason: reason.into(),
            exit_report: None,
            session_count: 0,
        }
    }

    /// Close this identity. Consumes the reigning record so an archived
    /// identity cannot be archived twice.
    #[must_use]
    pub fn archive(self, exit_report: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            ended_at: Some(now),
            exit_report: Some(exit_report.into()),
            ..self
        }
    }

    pub(crate) fn increment_sessions(&mut self) {
        self.session_count = self.session_count.saturating_add(1);
    }

    #[must_use]
    pub fn id(&self) -> IdentityId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn exit_report(&self) -> Option<&str> {
        self.exit_report.as_deref()
    }

    #[must_use]
    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.ended_at.is_some()
    }
}

/// Who, if anyone, holds executive authority.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "identity")]
pub enum Reign {
    #[default]
    NoIdentity,
    Reigning(Identity),
}

impl Reign {
    #[must_use]
    pub fn current(&self) -> Option<&Identity> {
        match self {
            Reign::NoIdentity => None,
            Reign::Reigning(identity) => Some(identity),
        }
    }

    #[must_use]
    pub fn is_reigning(&self) -> bool {
        matches!(self, Reign::Reigning(_))
    }

    /// Leave the reign vacant, handing back the previous holder.
    pub fn vacate(&mut self) -> Option<Identity> {
        match std::mem::take(self) {
            Reign::NoIdentity => None,
            Reign::Reigning(identity) => Some(identity),
        }
    }

    /// Count a session against the reigning identity. No-op when vacant.
    pub fn record_session(&mut self) -> Option<u32> {
        match self {
            Reign::NoIdentity => None,
            Reign::Reigning(identity) => {
                identity.increment_sessions();
                Some(identity.session_count())
            }
        }
    }
}
