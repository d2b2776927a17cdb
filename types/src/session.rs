//! Journal sessions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{DecisionId, IdentityId, SessionId};
use crate::seat::SeatKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Daily,
    Weekly,
}

impl SessionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionType::Daily => "daily",
            SessionType::Weekly => "weekly",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown session type: {0} (expected daily or weekly)")]
pub struct SessionTypeParseError(pub String);

impl FromStr for SessionType {
    type Err = SessionTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(SessionType::Daily),
            "weekly" => Ok(SessionType::Weekly),
            other => Err(SessionTypeParseError(other.to_string())),
        }
    }
}

/// A journal entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    timestamp: DateTime<Utc>,
    session_type: SessionType,
    statements: BTreeMap<SeatKind, String>,
    final_policy: String,
    decisions: Vec<DecisionId>,
    identity: IdentityId,
}

impl Session {
    #[must_use]
    pub fn new(
        id: SessionId,
        session_type: SessionType,
        statements: BTreeMap<SeatKind, String>,
        final_policy: String,
        decisions: Vec<DecisionId>,
        identity: IdentityId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            timestamp: now,
            session_type,
            statements,
            final_policy,
            decisions,
            identity,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    #[must_use]
    pub fn statements(&self) -> &BTreeMap<SeatKind, String> {
        &self.statements
    }

    /// The seat's statement, or `""` if it stayed silent.
    #[must_use]
    pub fn statement(&self, seat: SeatKind) -> &str {
        self.statements.get(&seat).map_or("", String::as_str)
    }

    #[must_use]
    pub fn final_policy(&self) -> &str {
        &self.final_policy
    }

    #[must_use]
    pub fn decisions(&self) -> &[DecisionId] {
        &self.decisions
    }

    #[must_use]
    pub fn identity(&self) -> IdentityId {
        self.identity
    }

    /// Every statement followed by the final policy, space separated.
    ///
    /// This is the text scanned for emergency keywords.
    #[must_use]
    pub fn full_text(&self) -> String {
        let mut text = self
            .statements
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        text.push(' ');
        text.push_str(&self.final_policy);
        text
    }
}
