//! Core domain types for the parliament.
//!
//! This crate contains pure domain types with no IO and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod constitution;
mod custom_seat;
mod decision;
mod emergency;
mod identity;
mod ids;
mod law;
mod proofs;
mod seat;
mod session;
mod state;
pub mod text;
mod vote;

pub use constitution::Constitution;
pub use custom_seat::{
    CustomSeat, CustomSeatProfile, CustomSeatSpec, ExpiryCondition, ExpiryConditionParseError,
    MAX_ACTIVE_CUSTOM_SEATS, MAX_COMBINED_CUSTOM_WEIGHT, Retirement, RetirementReason,
};
pub use decision::Decision;
pub use emergency::{EmergencyInitiator, EmergencyLogEntry, TRIGGER_TEXT_LIMIT};
pub use identity::{Identity, Reign};
pub use ids::{CustomSeatId, DecisionId, IdAllocator, IdentityId, LawId, SessionId};
pub use law::{
    Law, LawAction, LawEvent, LawKind, LawKindParseError, LawStatus, LawTransitionError,
};
pub use proofs::{EmptyStringError, NonEmptyString};
pub use seat::{Seat, SeatKind};
pub use session::{Session, SessionType, SessionTypeParseError};
pub use state::{ExportBundle, ParliamentState, STATE_FORMAT_VERSION};
pub use vote::{BallotLine, Vote, VoteMode, VoteOutcome, Voter};
