//! Temporary, capped, expirable seats.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NonEmptyString;
use crate::ids::CustomSeatId;

/// Maximum number of simultaneously active custom seats.
pub const MAX_ACTIVE_CUSTOM_SEATS: usize = 2;
/// Maximum combined weight of all active custom seats.
pub const MAX_COMBINED_CUSTOM_WEIGHT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryCondition {
    #[default]
    Manual,
    /// Expiry value is a whole-day count from creation.
    TimeBased,
    /// Retired only when the caller dismisses the seat.
    EventBased,
}

impl ExpiryCondition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExpiryCondition::Manual => "manual",
            ExpiryCondition::TimeBased => "time-based",
            ExpiryCondition::EventBased => "event-based",
        }
    }
}

impl fmt::Display for ExpiryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown expiry condition: {0} (expected manual, time-based or event-based)")]
pub struct ExpiryConditionParseError(pub String);

impl FromStr for ExpiryCondition {
    type Err = ExpiryConditionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "manual" => Ok(ExpiryCondition::Manual),
            "time-based" | "time_based" | "time" => Ok(ExpiryCondition::TimeBased),
            "event-based" | "event_based" | "event" => Ok(ExpiryCondition::EventBased),
            other => Err(ExpiryConditionParseError(other.to_string())),
        }
    }
}

/// Descriptive template filled in when a custom seat is convened.
///
/// None of these fields affect voting; they are carried for the journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSeatProfile {
    #[serde(default)]
    pub primary_function: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub values: String,
    #[serde(default)]
    pub deliberately_ignore: String,
    #[serde(default)]
    pub tone_of_voice: String,
    #[serde(default)]
    pub allowed_emotional_range: String,
    #[serde(default)]
    pub decision_bias: String,
}

/// Admission request for a new custom seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSeatSpec {
    pub name: NonEmptyString,
    pub weight: u32,
    pub expiry: ExpiryCondition,
    pub expiry_value: String,
    pub profile: CustomSeatProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum RetirementReason {
    Dismissed(String),
    AutoExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retirement {
    pub at: DateTime<Utc>,
    pub reason: RetirementReason,
}

/// A temporary seat.
///
/// A seat is active exactly while it has no retirement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSeat {
    id: CustomSeatId,
    name: NonEmptyString,
    weight: u32,
    expiry: ExpiryCondition,
    expiry_value: String,
    #[serde(default)]
    profile: CustomSeatProfile,
    created_at: DateTime<Utc>,
    #[serde(default)]
    retired: Option<Retirement>,
}

impl CustomSeat {
    #[must_use]
    pub fn convene(id: CustomSeatId, spec: CustomSeatSpec, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: spec.name,
            weight: spec.weight,
            expiry: spec.expiry,
            expiry_value: spec.expiry_value,
            profile: spec.profile,
            created_at: now,
            retired: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> CustomSeatId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[must_use]
    pub fn expiry(&self) -> ExpiryCondition {
        self.expiry
    }

    #[must_use]
    pub fn expiry_value(&self) -> &str {
        &self.expiry_value
    }

    #[must_use]
    pub fn profile(&self) -> &CustomSeatProfile {
        &self.profile
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn retirement(&self) -> Option<&Retirement> {
        self.retired.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.retired.is_none()
    }

    /// Case-insensitive name match.
    #[must_use]
    pub fn is_named(&self, raw: &str) -> bool {
        self.name.matches(raw)
    }

    /// True when `raw` is this seat's id or (case-insensitively) its name.
    #[must_use]
    pub fn answers_to(&self, raw: &str) -> bool {
        let raw = raw.trim();
        raw.parse::<u64>().is_ok_and(|id| id == self.id.value()) || self.name.matches(raw)
    }

    /// Day count after which a time-based seat retires itself.
    ///
    /// `None` for manual and event-based seats, and for time-based seats whose
    /// value is not a non-negative integer: those never auto-expire.
    #[must_use]
    pub fn auto_expiry_days(&self) -> Option<i64> {
        match self.expiry {
            ExpiryCondition::TimeBased => self
                .expiry_value
                .trim()
                .parse()
                .ok()
                .filter(|days: &i64| *days >= 0),
            ExpiryCondition::Manual | ExpiryCondition::EventBased => None,
        }
    }

    /// Whole days elapsed since creation, or `None` if `now` predates it.
    #[must_use]
    pub fn age_in_days(&self, now: DateTime<Utc>) -> Option<i64> {
        (now >= self.created_at).then(|| (now - self.created_at).num_days())
    }

    pub fn set_expiry_value(&mut self, value: String) {
        self.expiry_value = value;
    }

    /// Returns `false` if the seat was already retired; the first retirement wins.
    pub fn retire(&mut self, reason: RetirementReason, now: DateTime<Utc>) -> bool {
        if self.retired.is_some() {
            return false;
        }
        self.retired = Some(Retirement { at: now, reason });
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{
        CustomSeat, CustomSeatProfile, CustomSeatSpec, ExpiryCondition, RetirementReason,
    };
    use crate::NonEmptyString;
    use crate::ids::CustomSeatId;

    fn seat(expiry: ExpiryCondition, value: &str) -> CustomSeat {
        let spec = CustomSeatSpec {
            name: NonEmptyString::new("Grief Counsel").unwrap(),
            weight: 1,
            expiry,
            expiry_value: value.to_string(),
            profile: CustomSeatProfile::default(),
        };
        CustomSeat::convene(
            CustomSeatId::new(7),
            spec,
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn expiry_condition_parses_kebab_and_snake() {
        assert_eq!("time-based".parse::<ExpiryCondition>(), Ok(ExpiryCondition::TimeBased));
        assert_eq!("Event_Based".parse::<ExpiryCondition>(), Ok(ExpiryCondition::EventBased));
        assert_eq!("".parse::<ExpiryCondition>(), Ok(ExpiryCondition::Manual));
        assert!("whenever".parse::<ExpiryCondition>().is_err());
    }

    #[test]
    fn auto_expiry_only_for_numeric_time_based() {
        assert_eq!(seat(ExpiryCondition::TimeBased, "14").auto_expiry_days(), Some(14));
        assert_eq!(seat(ExpiryCondition::TimeBased, "two weeks").auto_expiry_days(), None);
        assert_eq!(seat(ExpiryCondition::TimeBased, "-3").auto_expiry_days(), None);
        assert_eq!(seat(ExpiryCondition::Manual, "14").auto_expiry_days(), None);
        assert_eq!(seat(ExpiryCondition::EventBased, "14").auto_expiry_days(), None);
    }

    #[test]
    fn answers_to_id_or_name() {
        let s = seat(ExpiryCondition::Manual, "");
        assert!(s.answers_to("7"));
        assert!(s.answers_to("grief counsel"));
        assert!(!s.answers_to("8"));
    }

    #[test]
    fn first_retirement_wins() {
        let mut s = seat(ExpiryCondition::Manual, "");
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        assert!(s.retire(RetirementReason::AutoExpired, now));
        assert!(!s.retire(RetirementReason::Dismissed("late".into()), now));
        assert!(!s.is_active());
        assert_eq!(
            s.retirement().map(|r| &r.reason),
            Some(&RetirementReason::AutoExpired)
        );
    }

    #[test]
    fn serde_condition_uses_kebab_case() {
        let json = serde_json::to_string(&ExpiryCondition::TimeBased).unwrap();
        assert_eq!(json, "\"time-based\"");
    }
}
