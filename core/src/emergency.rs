//! Emergency keyword detection.

use std::iter;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use chrono::{DateTime, Utc};
use parliament_types::{EmergencyInitiator, EmergencyLogEntry, ParliamentState, VoteMode};

/// Phrases that always arm emergency mode. Configuration can add to these,
/// never remove them.
pub const DEFAULT_KEYWORDS: [&str; 7] = [
    "suicide",
    "kill",
    "end it",
    "can't go on",
    "can't take it",
    "want to die",
    "self-harm",
];

pub const DETECTED_ACTIONS: &str = "Emergency mode activated";
pub const MANUAL_TRIGGER_TEXT: &str = "Manual emergency activation";
pub const MANUAL_ACTIONS: &str = "Emergency mode initiated by user";

/// Case-insensitive substring scanner over the keyword list.
#[derive(Debug, Clone)]
pub struct EmergencyDetector {
    keywords: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl Default for EmergencyDetector {
    fn default() -> Self {
        Self::with_extra_keywords(iter::empty::<&str>())
    }
}

impl EmergencyDetector {
    /// Built-in keywords plus `extra`. Blank extras are ignored.
    #[must_use]
    pub fn with_extra_keywords<S: AsRef<str>>(extra: impl IntoIterator<Item = S>) -> Self {
        let mut keywords: Vec<String> = DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect();
        for keyword in extra {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() && !keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
                keywords.push(keyword.to_string());
            }
        }

        let matcher = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostFirst)
            .build(&keywords)
            .map_err(|e| {
                tracing::warn!("Failed to build emergency matcher: {e}");
            })
            .ok();

        Self { keywords, matcher }
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// The first keyword found in `text`, if any.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<&str> {
        match &self.matcher {
            Some(matcher) => matcher
                .find(text)
                .map(|found| self.keywords[found.pattern().as_usize()].as_str()),
            // Fallback scan if the automaton could not be built.
            None => {
                let lower = text.to_lowercase();
                self.keywords
                    .iter()
                    .find(|keyword| lower.contains(&keyword.to_lowercase()))
                    .map(String::as_str)
            }
        }
    }

    #[must_use]
    pub fn scan(&self, text: &str) -> bool {
        let hit = self.find(text);
        tracing::debug!(triggered = hit.is_some(), "Emergency scan");
        hit.is_some()
    }
}

/// Set the next vote to run in emergency mode.
pub fn arm(state: &mut ParliamentState) {
    if !state.next_vote_mode.is_emergency() {
        tracing::warn!("Emergency mode armed for the next vote");
    }
    state.next_vote_mode = VoteMode::Emergency;
}

#[must_use]
pub fn detection_entry(trigger_text: &str, now: DateTime<Utc>) -> EmergencyLogEntry {
    EmergencyLogEntry::new(
        trigger_text,
        DETECTED_ACTIONS,
        EmergencyInitiator::KeywordDetection,
        now,
    )
}

#[must_use]
pub fn manual_entry(now: DateTime<Utc>) -> EmergencyLogEntry {
    EmergencyLogEntry::new(
        MANUAL_TRIGGER_TEXT,
        MANUAL_ACTIONS,
        EmergencyInitiator::Manual,
        now,
    )
}
