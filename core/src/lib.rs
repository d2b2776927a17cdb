//! Engines for the parliament.
//!
//! Each engine module works on an explicit [`ParliamentState`] and takes the
//! current time as an argument. [`Parliament`] wraps them in store
//! transactions.
//!
//! [`ParliamentState`]: parliament_types::ParliamentState

#![allow(clippy::missing_errors_doc)]

pub mod analytics;
pub mod custom_seats;
pub mod emergency;
mod error;
pub mod identity;
pub mod laws;
mod parliament;
pub mod registry;
pub mod sessions;
pub mod voting;

pub use analytics::{AnalyticsSummary, Direction, Trend, Warning};
pub use custom_seats::Admission;
pub use emergency::{DEFAULT_KEYWORDS, EmergencyDetector};
pub use error::{
    CapacityError, NotFoundError, ParliamentError, Result, StateError, ValidationError,
};
pub use parliament::{
    DEFAULT_WINDOW_DAYS, Parliament, ParliamentOptions, STATUS_RECENT_SESSIONS, SessionRecord,
    Status,
};
pub use voting::{Chamber, DEFAULT_OPTIONS};
