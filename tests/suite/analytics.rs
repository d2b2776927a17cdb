use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use parliament_core::{Direction, Parliament, ParliamentOptions, Warning};
use parliament_store::MemoryStore;
use parliament_types::SeatKind;

use crate::common::{fixed_now, reigning};

static DAYS_ELAPSED: AtomicI64 = AtomicI64::new(0);

fn stepped_clock() -> DateTime<Utc> {
    fixed_now() + TimeDelta::days(DAYS_ELAPSED.load(Ordering::SeqCst))
}

#[test]
fn empty_parliament_reports_no_activity() {
    let parliament = reigning();
    let summary = parliament.analytics_summary(None).unwrap();
    assert_eq!(summary.window_days, 7);
    assert_eq!(summary.warnings, vec![Warning::NoActivity]);
    assert_eq!(summary.messages(), vec![
        "No significant parliament activity detected"
    ]);
}

#[test]
fn short_term_monologue_raises_all_three_warnings() {
    let parliament = reigning();
    parliament
        .record_session(
            "daily",
            [("Short-Term", "Order takeout, skip the gym, watch one more episode.")],
            "",
            Vec::new(),
        )
        .unwrap();

    let summary = parliament.analytics_summary(Some(7)).unwrap();
    assert_eq!(summary.warnings, vec![
        Warning::ShortTermDominance,
        Warning::PurposeSilence,
        Warning::UltimateSilence,
    ]);
    assert_eq!(summary.frequency[&SeatKind::ShortTerm], 1);
    assert_eq!(summary.frequency[&SeatKind::Purpose], 0);
}

#[test]
fn balanced_session_is_healthy() {
    let parliament = reigning();
    parliament
        .record_session(
            "weekly",
            [
                ("Short-Term", "Sleep in."),
                ("Mid-Term", "Finish the course."),
                ("Long-Term", "Keep saving."),
                ("Purpose", "Teach what I learn."),
                ("Ultimate", "Call my parents."),
            ],
            "Balanced week",
            Vec::new(),
        )
        .unwrap();
    let summary = parliament.analytics_summary(None).unwrap();
    assert!(summary.is_healthy());
    assert_eq!(summary.messages(), vec!["Parliament balance appears healthy"]);
}

#[test]
fn window_excludes_old_sessions_and_trend_compares_double_window() {
    let parliament = Parliament::new(MemoryStore::new(), ParliamentOptions::default())
        .with_clock(stepped_clock);
    parliament.init(None).unwrap();
    parliament.create_identity("Builder", "").unwrap();

    parliament
        .record_session("daily", [("Purpose", "abcdefghij")], "", Vec::new())
        .unwrap();
    DAYS_ELAPSED.store(10, Ordering::SeqCst);
    parliament
        .record_session("daily", [("Purpose", "abcd")], "", Vec::new())
        .unwrap();

    let summary = parliament.analytics_summary(Some(7)).unwrap();
    assert_eq!(summary.dominance[&SeatKind::Purpose], 4);
    let trend = summary.trends[&SeatKind::Purpose];
    assert_eq!((trend.current, trend.previous), (4, 14));
    assert_eq!(trend.direction, Direction::Down);
    assert_eq!(trend.change, -10);
    assert_eq!(summary.trends[&SeatKind::Ultimate].direction, Direction::Stable);

    let recent = parliament.recent_sessions(1).unwrap();
    assert_eq!(recent[0].statement(SeatKind::Purpose), "abcd");
}

#[test]
fn voting_dominance_counts_normal_weight_of_yes_votes() {
    let parliament = reigning();
    parliament
        .cast_vote(
            "Run a marathon",
            Vec::new(),
            [("Purpose", "yes"), ("Ultimate", "yes"), ("Short-Term", "no")],
        )
        .unwrap();
    let summary = parliament.analytics_summary(None).unwrap();
    assert_eq!(summary.voting_dominance[&SeatKind::Purpose], 4);
    assert_eq!(summary.voting_dominance[&SeatKind::Ultimate], 5);
    assert_eq!(summary.voting_dominance[&SeatKind::ShortTerm], 0);
}
