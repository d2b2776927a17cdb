//! Emergency audit trail records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::truncate_chars;

/// Trigger text beyond this many characters is dropped from the log.
pub const TRIGGER_TEXT_LIMIT: usize = 200;

/// Who put the parliament into emergency mode.
///
/// Serialized as the human-readable label that appears in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyInitiator {
    #[serde(rename = "System (keyword detection)")]
    KeywordDetection,
    #[serde(rename = "User command")]
    Manual,
}

impl EmergencyInitiator {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EmergencyInitiator::KeywordDetection => "System (keyword detection)",
            EmergencyInitiator::Manual => "User command",
        }
    }
}

impl fmt::Display for EmergencyInitiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyLogEntry {
    timestamp: DateTime<Utc>,
    trigger_text: String,
    actions_taken: String,
    initiator: EmergencyInitiator,
}

impl EmergencyLogEntry {
    #[must_use]
    pub fn new(
        trigger_text: &str,
        actions_taken: impl Into<String>,
        initiator: EmergencyInitiator,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: now,
            trigger_text: truncate_chars(trigger_text, TRIGGER_TEXT_LIMIT),
            actions_taken: actions_taken.into(),
            initiator,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn trigger_text(&self) -> &str {
        &self.trigger_text
    }

    #[must_use]
    pub fn actions_taken(&self) -> &str {
        &self.actions_taken
    }

    #[must_use]
    pub fn initiator(&self) -> EmergencyInitiator {
        self.initiator
    }
}
