use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of an acting identity (reigning or archived).
    IdentityId
);
record_id!(CustomSeatId);
record_id!(DecisionId);
record_id!(SessionId);
record_id!(LawId);

/// Monotonic id counters persisted with the state.
///
/// Ids are never reused, even after the record they named is retired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    identity: u64,
    custom_seat: u64,
    decision: u64,
    session: u64,
    law: u64,
}

impl IdAllocator {
    fn bump(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }

    pub fn next_identity(&mut self) -> IdentityId {
        IdentityId(Self::bump(&mut self.identity))
    }

    pub fn next_custom_seat(&mut self) -> CustomSeatId {
        CustomSeatId(Self::bump(&mut self.custom_seat))
    }

    pub fn next_decision(&mut self) -> DecisionId {
        DecisionId(Self::bump(&mut self.decision))
    }

    pub fn next_session(&mut self) -> SessionId {
        SessionId(Self::bump(&mut self.session))
    }

    pub fn next_law(&mut self) -> LawId {
        LawId(Self::bump(&mut self.law))
    }
}
