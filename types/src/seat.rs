//! Permanent seats and their fixed voting weights.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vote::VoteMode;

/// The six permanent seats: five time horizons plus the acting identity.
///
/// Variant order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    ShortTerm,
    MidTerm,
    LongTerm,
    Purpose,
    Ultimate,
    ActingIdentity,
}

impl SeatKind {
    pub const ALL: [SeatKind; 6] = [
        SeatKind::ShortTerm,
        SeatKind::MidTerm,
        SeatKind::LongTerm,
        SeatKind::Purpose,
        SeatKind::Ultimate,
        SeatKind::ActingIdentity,
    ];

    /// Seats whose statements feed speaking analytics.
    pub const HORIZONS: [SeatKind; 5] = [
        SeatKind::ShortTerm,
        SeatKind::MidTerm,
        SeatKind::LongTerm,
        SeatKind::Purpose,
        SeatKind::Ultimate,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SeatKind::ShortTerm => "Short-Term",
            SeatKind::MidTerm => "Mid-Term",
            SeatKind::LongTerm => "Long-Term",
            SeatKind::Purpose => "Purpose",
            SeatKind::Ultimate => "Ultimate",
            SeatKind::ActingIdentity => "Acting-Identity",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            SeatKind::ShortTerm => "Focused on immediate needs, pleasure, survival instincts",
            SeatKind::MidTerm => "Planning weeks/months ahead, career moves, relationships",
            SeatKind::LongTerm => "Years-ahead vision, legacy building, strategic positioning",
            SeatKind::Purpose => "Life meaning, values alignment, existential direction",
            SeatKind::Ultimate => "Death-aware wisdom, final chapter perspective, truth above all",
            SeatKind::ActingIdentity => "Current identity version, executive and synthesizer",
        }
    }

    /// Fixed weight of this seat under `mode`.
    ///
    /// Normal weights sum to 18. In emergency mode Short-Term is barred (0)
    /// and Long-Term is doubled.
    #[must_use]
    pub const fn weight(self, mode: VoteMode) -> u32 {
        match (self, mode) {
            (SeatKind::ShortTerm, VoteMode::Normal) => 1,
            (SeatKind::ShortTerm, VoteMode::Emergency) => 0,
            (SeatKind::MidTerm, _) => 2,
            (SeatKind::LongTerm, VoteMode::Normal) | (SeatKind::ActingIdentity, _) => 3,
            (SeatKind::LongTerm, VoteMode::Emergency) => 6,
            (SeatKind::Purpose, _) => 4,
            (SeatKind::Ultimate, _) => 5,
        }
    }

    /// Resolve a user-supplied seat name.
    ///
    /// Case, spaces, hyphens and underscores are ignored, so `Short-Term`,
    /// `short_term` and `ShortTerm` all resolve, as does the long form
    /// `Short-Term Bruce`. `reigning` is accepted for the acting identity.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let folded = folded.strip_suffix("bruce").unwrap_or(&folded);
        match folded {
            "shortterm" | "short" => Some(SeatKind::ShortTerm),
            "midterm" | "mid" => Some(SeatKind::MidTerm),
            "longterm" | "long" => Some(SeatKind::LongTerm),
            "purpose" => Some(SeatKind::Purpose),
            "ultimate" => Some(SeatKind::Ultimate),
            "actingidentity" | "acting" | "identity" | "reigning" => Some(SeatKind::ActingIdentity),
            _ => None,
        }
    }
}

impl fmt::Display for SeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A permanent seat in the registry.
///
/// Permanent seats are never deleted. Deactivating one makes it inert in
/// votes (weight 0) without losing its place in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    kind: SeatKind,
    name: String,
    weight: u32,
    description: String,
    permanent: bool,
    active: bool,
}

impl Seat {
    #[must_use]
    pub fn permanent(kind: SeatKind) -> Self {
        Self {
            kind,
            name: kind.label().to_string(),
            weight: kind.weight(VoteMode::Normal),
            description: kind.description().to_string(),
            permanent: true,
            active: true,
        }
    }

    /// The full permanent registry in canonical order.
    #[must_use]
    pub fn registry() -> Vec<Seat> {
        SeatKind::ALL.into_iter().map(Seat::permanent).collect()
    }

    #[must_use]
    pub fn kind(&self) -> SeatKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normal-mode weight.
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
