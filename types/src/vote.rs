//! Votes, voting modes, and the tally produced by the voting engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::CustomSeatId;
use crate::seat::SeatKind;

/// A normalized ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Yes,
    No,
    Abstain,
}

impl Vote {
    /// Normalize free-text input.
    ///
    /// `yes`/`y`/`1` is yes, `no`/`n`/`0` is no, anything else abstains.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "yes" | "y" | "1" => Vote::Yes,
            "no" | "n" | "0" => Vote::No,
            _ => Vote::Abstain,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Vote::Yes => "yes",
            Vote::No => "no",
            Vote::Abstain => "abstain",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which weight table and threshold a vote runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteMode {
    #[default]
    Normal,
    Emergency,
}

impl VoteMode {
    /// Minimum yes weight required to pass.
    #[must_use]
    pub const fn threshold(self) -> u32 {
        match self {
            VoteMode::Normal => 10,
            VoteMode::Emergency => 12,
        }
    }

    #[must_use]
    pub const fn is_emergency(self) -> bool {
        matches!(self, VoteMode::Emergency)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            VoteMode::Normal => "normal",
            VoteMode::Emergency => "emergency",
        }
    }
}

/// What a ballot name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "ref")]
pub enum Voter {
    Seat(SeatKind),
    Custom(CustomSeatId),
    /// A seat that already voted under another spelling.
    Duplicate,
    /// Present but inert: weighs nothing in any mode.
    Unrecognized,
}

/// One line of a tally breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotLine {
    /// Seat name exactly as it appeared on the ballot.
    pub seat: String,
    pub voter: Voter,
    pub vote: Vote,
    pub weight: u32,
}

/// Result of evaluating a set of votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub mode: VoteMode,
    pub yes_weight: u32,
    pub no_weight: u32,
    pub abstain_weight: u32,
    pub passed: bool,
    /// Only ever true in emergency mode.
    pub veto_triggered: bool,
    pub breakdown: Vec<BallotLine>,
}

impl VoteOutcome {
    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.mode.threshold()
    }
}
