//! The unit of persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constitution::Constitution;
use crate::custom_seat::CustomSeat;
use crate::decision::Decision;
use crate::emergency::EmergencyLogEntry;
use crate::identity::{Identity, Reign};
use crate::ids::IdAllocator;
use crate::law::Law;
use crate::seat::{Seat, SeatKind};
use crate::session::Session;
use crate::vote::VoteMode;

/// Current version of the on-disk state and export formats.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Everything the parliament knows, apart from the emergency audit log.
///
/// Operations take this by `&mut` and the caller persists it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParliamentState {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub seats: Vec<Seat>,
    #[serde(default)]
    pub reign: Reign,
    /// Archived identities in start order.
    #[serde(default)]
    pub identity_history: Vec<Identity>,
    #[serde(default)]
    pub custom_seats: Vec<CustomSeat>,
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub laws: Vec<Law>,
    #[serde(default)]
    pub constitution: Option<Constitution>,
    /// Mode for the next vote. Armed by emergency detection, consumed by the vote.
    #[serde(default)]
    pub next_vote_mode: VoteMode,
    #[serde(default)]
    pub ids: IdAllocator,
}

impl ParliamentState {
    #[must_use]
    pub fn new(now: DateTime<Utc>, constitution: Option<Constitution>) -> Self {
        Self {
            format_version: STATE_FORMAT_VERSION,
            created_at: now,
            seats: Seat::registry(),
            reign: Reign::NoIdentity,
            identity_history: Vec::new(),
            custom_seats: Vec::new(),
            decisions: Vec::new(),
            sessions: Vec::new(),
            laws: Vec::new(),
            constitution,
            next_vote_mode: VoteMode::Normal,
            ids: IdAllocator::default(),
        }
    }

    #[must_use]
    pub fn seat(&self, kind: SeatKind) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.kind() == kind)
    }

    pub fn seat_mut(&mut self, kind: SeatKind) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|seat| seat.kind() == kind)
    }
}

/// Lossless snapshot of a parliament: state plus audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub state: ParliamentState,
    #[serde(default)]
    pub emergency_log: Vec<EmergencyLogEntry>,
}
