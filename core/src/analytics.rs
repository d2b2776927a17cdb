//! Sliding-window analytics over sessions and decisions.
//!
//! Dominance is how much a seat spoke (statement characters), frequency is
//! how often it spoke at all, and the trend compares the window against the
//! double-length window ending at the same instant.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use parliament_types::{ParliamentState, SeatKind, Session, Vote, VoteMode, Voter};
use serde::Serialize;

const SHORT_TERM_MAX_SHARE: f64 = 0.5;
const PURPOSE_MIN_SHARE: f64 = 0.1;
const ULTIMATE_MIN_SHARE: f64 = 0.05;

/// Earliest timestamp inside a window of `days` ending at `now`.
#[must_use]
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn sessions_since(state: &ParliamentState, cutoff: DateTime<Utc>) -> impl Iterator<Item = &Session> {
    state
        .sessions
        .iter()
        .filter(move |session| session.timestamp() >= cutoff)
}

fn per_horizon(mut f: impl FnMut(SeatKind) -> u64) -> BTreeMap<SeatKind, u64> {
    SeatKind::HORIZONS.into_iter().map(|kind| (kind, f(kind))).collect()
}

/// Statement characters per horizon seat over the window.
#[must_use]
pub fn dominance(state: &ParliamentState, days: u32, now: DateTime<Utc>) -> BTreeMap<SeatKind, u64> {
    let cutoff = window_start(now, days);
    per_horizon(|kind| {
        sessions_since(state, cutoff)
            .map(|session| session.statement(kind).chars().count() as u64)
            .sum()
    })
}

/// Sessions in the window where each horizon seat said anything.
#[must_use]
pub fn frequency(state: &ParliamentState, days: u32, now: DateTime<Utc>) -> BTreeMap<SeatKind, u64> {
    let cutoff = window_start(now, days);
    per_horizon(|kind| {
        sessions_since(state, cutoff)
            .filter(|session| !session.statement(kind).is_empty())
            .count() as u64
    })
}

/// Normal-mode weight each seat put behind the motions it voted yes on,
/// over decisions in the window. Emergency decisions count the same way.
#[must_use]
pub fn voting_dominance(
    state: &ParliamentState,
    days: u32,
    now: DateTime<Utc>,
) -> BTreeMap<SeatKind, u64> {
    let cutoff = window_start(now, days);
    let mut totals: BTreeMap<SeatKind, u64> = SeatKind::ALL.into_iter().map(|k| (k, 0)).collect();
    for decision in state.decisions.iter().filter(|d| d.timestamp() >= cutoff) {
        for line in decision.breakdown() {
            if let Voter::Seat(kind) = line.voter
                && line.vote == Vote::Yes
            {
                *totals.entry(kind).or_default() += u64::from(kind.weight(VoteMode::Normal));
            }
        }
    }
    totals
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stable,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Stable => "stable",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub current: u64,
    pub previous: u64,
    pub direction: Direction,
    pub change: i64,
}

impl Trend {
    #[must_use]
    pub fn between(current: u64, previous: u64) -> Self {
        let current_signed = i64::try_from(current).unwrap_or(i64::MAX);
        let previous_signed = i64::try_from(previous).unwrap_or(i64::MAX);
        let (direction, change) = if previous == 0 {
            let direction = if current > 0 {
                Direction::Up
            } else {
                Direction::Stable
            };
            (direction, current_signed)
        } else {
            let change = current_signed.saturating_sub(previous_signed);
            let direction = match change.signum() {
                1 => Direction::Up,
                -1 => Direction::Down,
                _ => Direction::Stable,
            };
            (direction, change)
        };
        Self {
            current,
            previous,
            direction,
            change,
        }
    }
}

/// Compare each seat's dominance with the double-length window.
///
/// The longer window includes the shorter one.
#[must_use]
pub fn trend(state: &ParliamentState, days: u32, now: DateTime<Utc>) -> BTreeMap<SeatKind, Trend> {
    let current = dominance(state, days, now);
    let previous = dominance(state, days.saturating_mul(2), now);
    current
        .into_iter()
        .map(|(kind, now_chars)| {
            let before = previous.get(&kind).copied().unwrap_or_default();
            (kind, Trend::between(now_chars, before))
        })
        .collect()
}

/// Balance indicators derived from speaking shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    NoActivity,
    ShortTermDominance,
    PurposeSilence,
    UltimateSilence,
}

impl Warning {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Warning::NoActivity => "No significant parliament activity detected",
            Warning::ShortTermDominance => {
                "Short-Term Bruce dominance. Consider long-term consequences."
            }
            Warning::PurposeSilence => "Purpose Bruce silence. Risk of existential drift.",
            Warning::UltimateSilence => "Ultimate Bruce not consulted. Lacking death-aware wisdom.",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub const HEALTHY_MESSAGE: &str = "Parliament balance appears healthy";

#[allow(clippy::cast_precision_loss)]
fn share(part: u64, total: u64) -> f64 {
    part as f64 / total as f64
}

/// Warnings for a dominance map. Empty when the balance is healthy.
#[must_use]
pub fn warnings(dominance: &BTreeMap<SeatKind, u64>) -> Vec<Warning> {
    let total: u64 = dominance.values().sum();
    if total == 0 {
        return vec![Warning::NoActivity];
    }
    let of = |kind| share(dominance.get(&kind).copied().unwrap_or_default(), total);

    let mut found = Vec::new();
    if of(SeatKind::ShortTerm) > SHORT_TERM_MAX_SHARE {
        found.push(Warning::ShortTermDominance);
    }
    if of(SeatKind::Purpose) < PURPOSE_MIN_SHARE {
        found.push(Warning::PurposeSilence);
    }
    if of(SeatKind::Ultimate) < ULTIMATE_MIN_SHARE {
        found.push(Warning::UltimateSilence);
    }
    found
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub window_days: u32,
    pub dominance: BTreeMap<SeatKind, u64>,
    pub frequency: BTreeMap<SeatKind, u64>,
    pub voting_dominance: BTreeMap<SeatKind, u64>,
    pub trends: BTreeMap<SeatKind, Trend>,
    pub warnings: Vec<Warning>,
}

impl AnalyticsSummary {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warning messages, or the single healthy message.
    #[must_use]
    pub fn messages(&self) -> Vec<&'static str> {
        if self.warnings.is_empty() {
            vec![HEALTHY_MESSAGE]
        } else {
            self.warnings.iter().map(|w| w.message()).collect()
        }
    }
}

#[must_use]
pub fn summarize(state: &ParliamentState, days: u32, now: DateTime<Utc>) -> AnalyticsSummary {
    let dominance = dominance(state, days, now);
    let warnings = warnings(&dominance);
    tracing::debug!(window_days = days, warnings = warnings.len(), "Analytics summarized");
    AnalyticsSummary {
        window_days: days,
        frequency: frequency(state, days, now),
        voting_dominance: voting_dominance(state, days, now),
        trends: trend(state, days, now),
        dominance,
        warnings,
    }
}

/// The `n` most recent sessions, newest first.
#[must_use]
pub fn recent_sessions(state: &ParliamentState, n: usize) -> Vec<&Session> {
    let mut sessions: Vec<&Session> = state.sessions.iter().collect();
    sessions.sort_by_key(|session| Reverse((session.timestamp(), session.id())));
    sessions.truncate(n);
    sessions
}
