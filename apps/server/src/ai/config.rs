//! Bot configuration handling.
//!
//! Provides a typed interface over the free-form JSON configuration stored
//! per bot seat, extracting standard fields while preserving policy-specific
//! custom fields.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Standard configuration for a bot-controlled seat.
///
/// # Standard Fields
///
/// - `seed`: Optional RNG seed for deterministic behavior. If provided, the
///   policy should use this to seed its random number generator for
///   reproducible decision-making, useful in tests.
///
/// # Example
///
/// ```rust,ignore
/// let config = BotConfig::from_json(Some(&serde_json::json!({"seed": 42})));
/// let seed = config.seed();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Policy-specific configuration, preserved verbatim from whatever
    /// fields weren't recognized as standard above.
    #[serde(flatten)]
    pub custom: JsonValue,
}

impl BotConfig {
    pub fn from_json(config: Option<&JsonValue>) -> Self {
        match config {
            Some(json) => serde_json::from_value(json.clone()).unwrap_or_else(|_| Self::empty()),
            None => Self::empty(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_custom(&self, key: &str) -> Option<&JsonValue> {
        self.custom.get(key)
    }

    pub fn empty() -> Self {
        Self {
            seed: None,
            custom: JsonValue::Object(serde_json::Map::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            custom: JsonValue::Object(serde_json::Map::new()),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_json_with_seed_only() {
        let json = json!({"seed": 12345});
        let config = BotConfig::from_json(Some(&json));
        assert_eq!(config.seed(), Some(12345));
    }

    #[test]
    fn from_json_with_seed_and_custom() {
        let json = json!({"seed": 67890, "aggression": "high"});
        let config = BotConfig::from_json(Some(&json));
        assert_eq!(config.seed(), Some(67890));
        assert_eq!(config.get_custom("aggression"), Some(&json!("high")));
    }

    #[test]
    fn from_json_none_is_empty() {
        let config = BotConfig::from_json(None);
        assert_eq!(config.seed(), None);
        assert!(config.get_custom("anything").is_none());
    }

    #[test]
    fn with_seed_sets_only_seed() {
        let config = BotConfig::with_seed(99999);
        assert_eq!(config.seed(), Some(99999));
        assert!(config.get_custom("anything").is_none());
    }
}
