use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DecisionId, IdentityId};
use crate::vote::{BallotLine, Vote, VoteMode, VoteOutcome, Voter};

/// A recorded vote. Immutable once created.
///
/// `weighted_result` is the yes weight, not the maximum possible score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    id: DecisionId,
    topic: String,
    options: Vec<String>,
    votes: BTreeMap<String, Vote>,
    weighted_result: u32,
    passed: bool,
    veto_triggered: bool,
    mode: VoteMode,
    timestamp: DateTime<Utc>,
    identity: IdentityId,
    breakdown: Vec<BallotLine>,
}

impl Decision {
    #[must_use]
    pub fn record(
        id: DecisionId,
        topic: impl Into<String>,
        options: Vec<String>,
        outcome: VoteOutcome,
        identity: IdentityId,
        now: DateTime<Utc>,
    ) -> Self {
        let votes = outcome
            .breakdown
            .iter()
            .filter(|line| line.voter != Voter::Duplicate)
            .map(|line| (line.seat.clone(), line.vote))
            .collect();
        Self {
            id,
            topic: topic.into(),
            options,
            votes,
            weighted_result: outcome.yes_weight,
            passed: outcome.passed,
            veto_triggered: outcome.veto_triggered,
            mode: outcome.mode,
            timestamp: now,
            identity,
            breakdown: outcome.breakdown,
        }
    }

    #[must_use]
    pub fn id(&self) -> DecisionId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn votes(&self) -> &BTreeMap<String, Vote> {
        &self.votes
    }

    #[must_use]
    pub fn weighted_result(&self) -> u32 {
        self.weighted_result
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn veto_triggered(&self) -> bool {
        self.veto_triggered
    }

    #[must_use]
    pub fn mode(&self) -> VoteMode {
        self.mode
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn identity(&self) -> IdentityId {
        self.identity
    }

    #[must_use]
    pub fn breakdown(&self) -> &[BallotLine] {
        &self.breakdown
    }
}
