//! The `Parliament` facade.
//!
//! Every mutating command is a critical section over the store:
//! lock, load, apply the transition to the in-memory state, save. A command
//! that fails before the save leaves persisted state untouched.

use chrono::{DateTime, Utc};
use parliament_store::Store;
use parliament_types::{
    Constitution, CustomSeat, Decision, DecisionId, EmergencyInitiator, EmergencyLogEntry,
    ExportBundle, Identity, Law, LawId, LawStatus, ParliamentState, STATE_FORMAT_VERSION, Seat,
    SeatKind, Session, VoteMode, VoteOutcome,
};

use crate::analytics::{self, AnalyticsSummary};
use crate::custom_seats::{self, Admission};
use crate::emergency::{self, EmergencyDetector};
use crate::error::{Result, StateError, ValidationError};
use crate::voting::{self, Chamber};
use crate::{identity, laws, registry, sessions};

/// Sessions shown by [`Parliament::status`].
pub const STATUS_RECENT_SESSIONS: usize = 3;
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Default)]
pub struct ParliamentOptions {
    /// Added to the built-in emergency keywords.
    pub extra_keywords: Vec<String>,
    /// Analytics window when none is given. 0 means the default.
    pub window_days: u32,
}

/// Overview of the current parliament.
#[derive(Debug, Clone)]
pub struct Status {
    pub reigning: Option<Identity>,
    pub seats: Vec<Seat>,
    pub active_custom_seats: Vec<CustomSeat>,
    pub recent_sessions: Vec<Session>,
    pub next_vote_mode: VoteMode,
    pub decision_count: usize,
    pub session_count: usize,
    pub active_law_count: usize,
}

/// Outcome of recording a session: the session, plus the audit entry when
/// its text armed emergency mode.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session: Session,
    pub emergency: Option<EmergencyLogEntry>,
}

pub struct Parliament<S> {
    store: S,
    detector: EmergencyDetector,
    window_days: u32,
    clock: fn() -> DateTime<Utc>,
}

impl<S: Store> Parliament<S> {
    #[must_use]
    pub fn new(store: S, options: ParliamentOptions) -> Self {
        let window_days = if options.window_days == 0 {
            DEFAULT_WINDOW_DAYS
        } else {
            options.window_days
        };
        Self {
            store,
            detector: EmergencyDetector::with_extra_keywords(&options.extra_keywords),
            window_days,
            clock: Utc::now,
        }
    }

    /// Replace the wall clock. Tests use this to step through expiry windows.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn detector(&self) -> &EmergencyDetector {
        &self.detector
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn transact<T>(
        &self,
        op: impl FnOnce(&mut ParliamentState, DateTime<Utc>) -> Result<T>,
    ) -> Result<T> {
        let _lock = self.store.lock()?;
        let mut state = self.store.load()?.ok_or(StateError::NotInitialized)?;
        let out = op(&mut state, self.now())?;
        self.store.save(&state)?;
        Ok(out)
    }

    fn read<T>(&self, op: impl FnOnce(&ParliamentState) -> T) -> Result<T> {
        let state = self.store.load()?.ok_or(StateError::NotInitialized)?;
        Ok(op(&state))
    }

    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.load()?.is_some())
    }

    /// Create a fresh parliament. Refuses to overwrite an existing one.
    pub fn init(&self, constitution: Option<Constitution>) -> Result<ParliamentState> {
        let _lock = self.store.lock()?;
        if self.store.load()?.is_some() {
            return Err(StateError::AlreadyInitialized.into());
        }
        let state = ParliamentState::new(self.now(), constitution);
        self.store.save(&state)?;
        tracing::info!("Parliament initialized");
        Ok(state)
    }

    pub fn state(&self) -> Result<ParliamentState> {
        self.read(Clone::clone)
    }

    pub fn constitution(&self) -> Result<Option<Constitution>> {
        self.read(|state| state.constitution.clone())
    }

    pub fn set_seat_active(&self, name: &str, active: bool) -> Result<SeatKind> {
        self.transact(|state, _| Ok(registry::set_seat_active(state, name, active)?))
    }

    /// Tally without recording anything.
    pub fn evaluate_vote<K, V>(
        &self,
        votes: impl IntoIterator<Item = (K, V)>,
        mode: VoteMode,
    ) -> Result<VoteOutcome>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.read(|state| voting::evaluate(&Chamber::of(state), votes, mode))
    }

    /// Tally in the mode the next recorded vote will use.
    pub fn preview_vote<K, V>(&self, votes: impl IntoIterator<Item = (K, V)>) -> Result<VoteOutcome>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.read(|state| voting::preview(state, votes))
    }

    pub fn cast_vote<K, V>(
        &self,
        topic: &str,
        options: Vec<String>,
        votes: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Decision>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.transact(|state, now| voting::cast_vote(state, topic, options, votes, now))
    }

    /// The `n` most recent decisions, newest first.
    pub fn recent_decisions(&self, n: usize) -> Result<Vec<Decision>> {
        self.read(|state| state.decisions.iter().rev().take(n).cloned().collect())
    }

    pub fn create_identity(&self, name: &str, reason: &str) -> Result<Identity> {
        self.transact(|state, now| identity::create(state, name, reason, now))
    }

    pub fn end_identity(&self, exit_report: &str) -> Result<Identity> {
        self.transact(|state, now| identity::end(state, exit_report, now))
    }

    pub fn rebirth(
        &self,
        exit_report: &str,
        name: &str,
        reason: &str,
    ) -> Result<(Identity, Identity)> {
        self.transact(|state, now| identity::rebirth(state, exit_report, name, reason, now))
    }

    pub fn current_identity(&self) -> Result<Option<Identity>> {
        self.read(|state| state.reign.current().cloned())
    }

    pub fn timeline(&self) -> Result<Vec<Identity>> {
        self.read(identity::timeline)
    }

    pub fn status(&self) -> Result<Status> {
        self.read(|state| Status {
            reigning: state.reign.current().cloned(),
            seats: state.seats.clone(),
            active_custom_seats: custom_seats::active(state).cloned().collect(),
            recent_sessions: analytics::recent_sessions(state, STATUS_RECENT_SESSIONS)
                .into_iter()
                .cloned()
                .collect(),
            next_vote_mode: state.next_vote_mode,
            decision_count: state.decisions.len(),
            session_count: state.sessions.len(),
            active_law_count: laws::list(state, Some(LawStatus::Active)).len(),
        })
    }

    pub fn admit_custom_seat(&self, admission: Admission) -> Result<CustomSeat> {
        self.transact(|state, now| custom_seats::admit(state, admission, now))
    }

    pub fn dismiss_custom_seat(&self, id_or_name: &str, reason: &str) -> Result<bool> {
        self.transact(|state, now| Ok(custom_seats::dismiss(state, id_or_name, reason, now)))
    }

    pub fn extend_custom_seat(&self, id_or_name: &str, new_value: &str) -> Result<bool> {
        self.transact(|state, _| Ok(custom_seats::extend(state, id_or_name, new_value)))
    }

    pub fn check_custom_expiries(&self) -> Result<Vec<CustomSeat>> {
        self.transact(|state, now| Ok(custom_seats::check_expiries(state, now)))
    }

    /// Active seats only, unless `include_retired`.
    pub fn list_custom_seats(&self, include_retired: bool) -> Result<Vec<CustomSeat>> {
        self.read(|state| {
            state
                .custom_seats
                .iter()
                .filter(|seat| include_retired || seat.is_active())
                .cloned()
                .collect()
        })
    }

    pub fn custom_seat(&self, id_or_name: &str) -> Result<Option<CustomSeat>> {
        self.read(|state| custom_seats::get(state, id_or_name).cloned())
    }

    #[must_use]
    pub fn scan_emergency(&self, text: &str) -> bool {
        self.detector.scan(text)
    }

    /// Append a record to the audit log without arming anything.
    pub fn log_emergency(
        &self,
        trigger_text: &str,
        actions_taken: &str,
        initiator: EmergencyInitiator,
    ) -> Result<EmergencyLogEntry> {
        let _lock = self.store.lock()?;
        let entry = EmergencyLogEntry::new(trigger_text, actions_taken, initiator, self.now());
        self.store.append_emergency(&entry)?;
        Ok(entry)
    }

    /// Arm emergency mode for the next vote on the user's request.
    pub fn trigger_emergency(&self) -> Result<EmergencyLogEntry> {
        self.transact(|state, now| {
            let entry = emergency::manual_entry(now);
            self.store.append_emergency(&entry)?;
            emergency::arm(state);
            Ok(entry)
        })
    }

    pub fn emergency_log(&self) -> Result<Vec<EmergencyLogEntry>> {
        Ok(self.store.emergency_log()?)
    }

    /// Record a session and scan its text. A keyword hit is logged before the
    /// session is saved; if the log append fails nothing is saved.
    pub fn record_session<K, V>(
        &self,
        session_type: &str,
        statements: impl IntoIterator<Item = (K, V)>,
        final_policy: &str,
        decisions: Vec<DecisionId>,
    ) -> Result<SessionRecord>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.transact(|state, now| {
            let session =
                sessions::record(state, session_type, statements, final_policy, decisions, now)?;
            let text = session.full_text();
            let emergency = if self.detector.scan(&text) {
                let entry = emergency::detection_entry(&text, now);
                self.store.append_emergency(&entry)?;
                emergency::arm(state);
                Some(entry)
            } else {
                None
            };
            Ok(SessionRecord { session, emergency })
        })
    }

    /// Summary over `window_days`, or the configured window when `None`.
    pub fn analytics_summary(&self, window_days: Option<u32>) -> Result<AnalyticsSummary> {
        let days = window_days.filter(|d| *d > 0).unwrap_or(self.window_days);
        let now = self.now();
        self.read(|state| analytics::summarize(state, days, now))
    }

    pub fn recent_sessions(&self, n: usize) -> Result<Vec<Session>> {
        self.read(|state| {
            analytics::recent_sessions(state, n)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn propose_law(
        &self,
        name: &str,
        kind: &str,
        proposer: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Law> {
        self.transact(|state, now| laws::propose(state, name, kind, proposer, expires_at, now))
    }

    pub fn pass_law(&self, id: LawId, decision: DecisionId) -> Result<Law> {
        self.transact(|state, now| laws::pass(state, id, decision, now))
    }

    pub fn amend_law(&self, id: LawId, amendment: &str, decision: DecisionId) -> Result<Law> {
        self.transact(|state, now| laws::amend(state, id, amendment, decision, now))
    }

    pub fn repeal_law(&self, id: LawId, reason: &str) -> Result<Law> {
        self.transact(|state, now| laws::repeal(state, id, reason, now))
    }

    pub fn expire_law(&self, id: LawId) -> Result<Law> {
        self.transact(|state, now| laws::expire(state, id, now))
    }

    pub fn check_law_expiries(&self) -> Result<Vec<Law>> {
        self.transact(|state, now| Ok(laws::check_expiries(state, now)))
    }

    pub fn law(&self, id: LawId) -> Result<Option<Law>> {
        self.read(|state| laws::get(state, id).cloned())
    }

    pub fn laws(&self, status: Option<LawStatus>) -> Result<Vec<Law>> {
        self.read(|state| laws::list(state, status).into_iter().cloned().collect())
    }

    pub fn export(&self) -> Result<ExportBundle> {
        let _lock = self.store.lock()?;
        let state = self.store.load()?.ok_or(StateError::NotInitialized)?;
        let emergency_log = self.store.emergency_log()?;
        Ok(ExportBundle {
            format_version: STATE_FORMAT_VERSION,
            exported_at: self.now(),
            state,
            emergency_log,
        })
    }

    /// Restore a bundle into an empty store.
    ///
    /// The audit log is written before the state. A store holding no state and
    /// a prefix of the bundle's log is an interrupted import; it is resumed.
    pub fn import(&self, bundle: ExportBundle) -> Result<()> {
        for found in [bundle.format_version, bundle.state.format_version] {
            if found > STATE_FORMAT_VERSION {
                return Err(ValidationError::BundleVersion {
                    found,
                    supported: STATE_FORMAT_VERSION,
                }
                .into());
            }
        }
        identity::check_invariant(&bundle.state)?;

        let _lock = self.store.lock()?;
        if self.store.load()?.is_some() {
            return Err(StateError::AlreadyInitialized.into());
        }
        let written = self.store.emergency_log()?;
        if !bundle.emergency_log.starts_with(&written) {
            return Err(StateError::AlreadyInitialized.into());
        }
        if !written.is_empty() {
            tracing::warn!(
                entries = written.len(),
                "Resuming interrupted import; audit entries already present"
            );
        }
        for entry in &bundle.emergency_log[written.len()..] {
            self.store.append_emergency(entry)?;
        }
        self.store.save(&bundle.state)?;
        tracing::info!(
            decisions = bundle.state.decisions.len(),
            sessions = bundle.state.sessions.len(),
            emergency_entries = bundle.emergency_log.len(),
            "Parliament imported"
        );
        Ok(())
    }
}
