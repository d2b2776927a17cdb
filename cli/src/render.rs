//! Plain-text rendering of command results.

use chrono::{DateTime, Utc};
use parliament_core::{AnalyticsSummary, Status};
use parliament_types::{
    CustomSeat, Decision, EmergencyLogEntry, ExpiryCondition, Identity, Law, SeatKind, Session,
    VoteOutcome, Voter,
};
use parliament_types::text::truncate_with_ellipsis;

/// Trigger text shown per audit line; the log itself keeps up to 200.
const TRIGGER_PREVIEW_CHARS: usize = 80;

fn stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn identity(identity: &Identity) -> String {
    let span = match identity.ended_at() {
        Some(ended) => format!("{} to {}", stamp(identity.started_at()), stamp(ended)),
        None => format!("since {}", stamp(identity.started_at())),
    };
    let mut line = format!(
        "#{} {} ({span}, {} sessions)",
        identity.id(),
        identity.name(),
        identity.session_count()
    );
    if !identity.reason().is_empty() {
        line.push_str(&format!("\n    reason: {}", identity.reason()));
    }
    if let Some(report) = identity.exit_report().filter(|r| !r.is_empty()) {
        line.push_str(&format!("\n    exit report: {report}"));
    }
    line
}

pub fn outcome(outcome: &VoteOutcome) -> String {
    let mut lines = Vec::new();
    for ballot in &outcome.breakdown {
        let note = match ballot.voter {
            Voter::Seat(_) | Voter::Custom(_) => "",
            Voter::Duplicate => " (duplicate, ignored)",
            Voter::Unrecognized => " (unrecognized seat)",
        };
        lines.push(format!(
            "  {:<20} {:<8} weight {}{note}",
            ballot.seat,
            ballot.vote.to_string(),
            ballot.weight
        ));
    }
    lines.push(format!(
        "mode {}: yes {} / no {} / abstain {} (needs {})",
        outcome.mode.as_str(),
        outcome.yes_weight,
        outcome.no_weight,
        outcome.abstain_weight,
        outcome.threshold()
    ));
    if outcome.veto_triggered {
        lines.push("Ultimate veto triggered".to_string());
    }
    lines.push(if outcome.passed { "PASSED" } else { "FAILED" }.to_string());
    lines.join("\n")
}

pub fn decision(decision: &Decision) -> String {
    format!(
        "decision #{} \"{}\" {} with {} ({} mode{}) at {}",
        decision.id(),
        decision.topic(),
        if decision.passed() { "passed" } else { "failed" },
        decision.weighted_result(),
        decision.mode().as_str(),
        if decision.veto_triggered() { ", vetoed" } else { "" },
        stamp(decision.timestamp())
    )
}

pub fn session(session: &Session) -> String {
    let mut lines = vec![format!(
        "session #{} ({}) at {}",
        session.id(),
        session.session_type(),
        stamp(session.timestamp())
    )];
    for kind in SeatKind::ALL {
        let statement = session.statement(kind);
        if !statement.is_empty() {
            lines.push(format!("  {kind}: {statement}"));
        }
    }
    if !session.final_policy().is_empty() {
        lines.push(format!("  policy: {}", session.final_policy()));
    }
    lines.join("\n")
}

pub fn custom_seat(seat: &CustomSeat) -> String {
    let expiry = match seat.expiry() {
        ExpiryCondition::Manual => "manual".to_string(),
        other => format!("{other} {}", seat.expiry_value()),
    };
    let state = if seat.is_active() { "active" } else { "retired" };
    format!(
        "#{} {} (weight {}, {expiry}, {state}, seated {})",
        seat.id(),
        seat.name(),
        seat.weight(),
        stamp(seat.created_at())
    )
}

pub fn law(law: &Law) -> String {
    let expiry = law
        .expires_at()
        .map(|at| format!(", expires {}", stamp(at)))
        .unwrap_or_default();
    format!(
        "law #{} {} [{}, {}{expiry}] ({} events)",
        law.id(),
        law.name(),
        law.kind(),
        law.status(),
        law.history().len()
    )
}

pub fn emergency(entry: &EmergencyLogEntry) -> String {
    format!(
        "{} [{}] {}: {}",
        stamp(entry.timestamp()),
        entry.initiator(),
        entry.actions_taken(),
        truncate_with_ellipsis(entry.trigger_text(), TRIGGER_PREVIEW_CHARS)
    )
}

pub fn status(status: &Status) -> String {
    let mut lines = Vec::new();
    match &status.reigning {
        Some(reigning) => lines.push(format!("Reigning: {}", identity(reigning))),
        None => lines.push("Reigning: none".to_string()),
    }
    lines.push(format!("Next vote: {} mode", status.next_vote_mode.as_str()));
    lines.push("Seats:".to_string());
    for seat in &status.seats {
        let inactive = if seat.is_active() { "" } else { " (inactive)" };
        lines.push(format!("  {:<16} {}{inactive}", seat.name(), seat.weight()));
    }
    if !status.active_custom_seats.is_empty() {
        lines.push("Custom seats:".to_string());
        for seat in &status.active_custom_seats {
            lines.push(format!("  {}", custom_seat(seat)));
        }
    }
    lines.push(format!(
        "{} decisions, {} sessions, {} active laws",
        status.decision_count, status.session_count, status.active_law_count
    ));
    for recent in &status.recent_sessions {
        lines.push(session(recent));
    }
    lines.join("\n")
}

pub fn summary(summary: &AnalyticsSummary) -> String {
    let mut lines = vec![format!("Last {} days", summary.window_days)];
    lines.push(format!(
        "  {:<12} {:>8} {:>6} {:>6}  trend",
        "seat", "chars", "spoke", "votes"
    ));
    for kind in SeatKind::HORIZONS {
        let chars = summary.dominance.get(&kind).copied().unwrap_or_default();
        let spoke = summary.frequency.get(&kind).copied().unwrap_or_default();
        let votes = summary.voting_dominance.get(&kind).copied().unwrap_or_default();
        let trend = summary
            .trends
            .get(&kind)
            .map(|t| format!("{} ({:+})", t.direction, t.change))
            .unwrap_or_default();
        lines.push(format!(
            "  {:<12} {chars:>8} {spoke:>6} {votes:>6}  {trend}",
            kind.label()
        ));
    }
    for message in summary.messages() {
        lines.push(format!("* {message}"));
    }
    lines.join("\n")
}
