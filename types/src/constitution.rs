use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Founding document. Loaded once at setup and carried through unmodified.
///
/// Every section is kept as raw JSON; nothing in the parliament interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constitution {
    #[serde(default)]
    pub core_values: Value,
    #[serde(default)]
    pub rights: Value,
    #[serde(default)]
    pub prohibited_actions: Value,
    #[serde(default)]
    pub amendment_rules: Value,
    #[serde(default)]
    pub emergency_powers: Value,
}
