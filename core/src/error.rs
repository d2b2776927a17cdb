//! Error types for parliament operations.
//!
//! Every variant except [`ParliamentError::Storage`] is raised before any
//! write, so a failed command leaves persisted state untouched.

use parliament_store::StorageError;
use parliament_types::{
    DecisionId, EmptyStringError, ExpiryConditionParseError, LawId, LawKindParseError,
    LawTransitionError, SessionTypeParseError,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("max active count reached: at most {max} custom seats may be active")]
    TooManySeats { max: usize },
    #[error("combined weight of custom seats would be {requested}, above the limit of {max}")]
    CombinedWeight { requested: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("no active custom seat matches {0:?}")]
    CustomSeat(String),
    #[error("no seat named {0:?}")]
    Seat(String),
    #[error("no decision with id {0}")]
    Decision(DecisionId),
    #[error("no law with id {0}")]
    Law(LawId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no acting identity is reigning")]
    NoActiveIdentity,
    #[error("parliament has not been initialized")]
    NotInitialized,
    #[error("parliament is already initialized")]
    AlreadyInitialized,
    #[error("more than one identity is reigning")]
    MultipleReigning,
    #[error("decision {0} did not pass")]
    DecisionNotPassed(DecisionId),
    #[error(transparent)]
    Law(#[from] LawTransitionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("custom seat weight must be at least 1")]
    ZeroWeight,
    #[error("{0:?} is the name of a permanent seat")]
    ReservedSeatName(String),
    #[error("a custom seat named {0:?} is already active")]
    SeatNameTaken(String),
    #[error("time-based expiry must be a non-negative day count, got {0}")]
    NegativeExpiryDays(i64),
    #[error("statement given for unknown seat {0:?}")]
    UnknownSeat(String),
    #[error("seat {0} spoke twice in one session")]
    DuplicateStatement(String),
    #[error("export bundle version {found} is not supported (expected at most {supported})")]
    BundleVersion { found: u32, supported: u32 },
    #[error(transparent)]
    SessionType(#[from] SessionTypeParseError),
    #[error(transparent)]
    ExpiryCondition(#[from] ExpiryConditionParseError),
    #[error(transparent)]
    LawKind(#[from] LawKindParseError),
}

impl ValidationError {
    #[must_use]
    pub fn empty(field: &'static str) -> impl FnOnce(EmptyStringError) -> Self {
        move |EmptyStringError| ValidationError::Empty { field }
    }
}

#[derive(Debug, Error)]
pub enum ParliamentError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<LawTransitionError> for ParliamentError {
    fn from(err: LawTransitionError) -> Self {
        ParliamentError::State(StateError::Law(err))
    }
}

pub type Result<T, E = ParliamentError> = std::result::Result<T, E>;
