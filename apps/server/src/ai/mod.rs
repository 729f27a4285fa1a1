//! Bot player module - handles automated decisions for bot-controlled seats.
//!
//! - **[`BotPolicy`]** trait - the interface a decision policy must implement
//! - **[`RandomPolicy`]** - reference implementation that makes random legal moves
//! - **[`BotConfig`]** - configuration handling with seed and custom fields
//! - **[`AiError`]** - error types for bot decision-making

mod config;
mod random;
mod trait_def;

pub use config::BotConfig;
pub use random::RandomPolicy;
pub use trait_def::{AiError, BotPolicy};

/// Construct a bot policy by name with the given configuration.
///
/// Currently supports:
/// - `"random"`: [`RandomPolicy`] with an optional seed from config.
///
/// Returns `None` if `policy_name` is unrecognized.
pub fn create_policy(policy_name: &str, config: BotConfig) -> Option<Box<dyn BotPolicy>> {
    match policy_name {
        RandomPolicy::NAME => Some(Box::new(RandomPolicy::new(config.seed()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_policy_name_returns_none() {
        assert!(create_policy("heuristic-v1", BotConfig::empty()).is_none());
    }

    #[test]
    fn random_policy_name_resolves() {
        assert!(create_policy("random", BotConfig::with_seed(1)).is_some());
    }
}
