use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Address the HTTP/WS listener binds to.
pub fn bind_addr() -> String {
    env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string())
}

/// How long a `BotDriver` waits before acting, to look less like a scripted
/// response. Compiled-in defaults, overridable per-deployment via env.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotTiming {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BotTiming {
    fn default() -> Self {
        BotTiming {
            min_delay: Duration::from_millis(400),
            max_delay: Duration::from_millis(1500),
        }
    }
}

impl BotTiming {
    /// Reads `CARDSERVER_BOT_MIN_DELAY_MS` / `CARDSERVER_BOT_MAX_DELAY_MS`,
    /// falling back to `Default::default()` for either that is unset.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = BotTiming::default();
        let min_delay = match env::var("CARDSERVER_BOT_MIN_DELAY_MS") {
            Ok(v) => Duration::from_millis(parse_millis(&v)?),
            Err(_) => defaults.min_delay,
        };
        let max_delay = match env::var("CARDSERVER_BOT_MAX_DELAY_MS") {
            Ok(v) => Duration::from_millis(parse_millis(&v)?),
            Err(_) => defaults.max_delay,
        };
        if min_delay > max_delay {
            return Err(AppError::config(
                "CARDSERVER_BOT_MIN_DELAY_MS must not exceed CARDSERVER_BOT_MAX_DELAY_MS",
            ));
        }
        Ok(BotTiming { min_delay, max_delay })
    }
}

fn parse_millis(v: &str) -> Result<u64, AppError> {
    v.parse()
        .map_err(|_| AppError::config(format!("expected an integer number of milliseconds, got '{v}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn bind_addr_defaults_to_localhost_8080() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("BIND_ADDR");
        assert_eq!(bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn bot_timing_defaults_are_min_before_max() {
        let t = BotTiming::default();
        assert!(t.min_delay < t.max_delay);
    }

    #[test]
    fn bot_timing_from_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("CARDSERVER_BOT_MIN_DELAY_MS", "100");
        env::set_var("CARDSERVER_BOT_MAX_DELAY_MS", "200");
        let t = BotTiming::from_env().unwrap();
        assert_eq!(t.min_delay, Duration::from_millis(100));
        assert_eq!(t.max_delay, Duration::from_millis(200));
        env::remove_var("CARDSERVER_BOT_MIN_DELAY_MS");
        env::remove_var("CARDSERVER_BOT_MAX_DELAY_MS");
    }

    #[test]
    fn bot_timing_rejects_min_greater_than_max() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("CARDSERVER_BOT_MIN_DELAY_MS", "5000");
        env::set_var("CARDSERVER_BOT_MAX_DELAY_MS", "100");
        assert!(BotTiming::from_env().is_err());
        env::remove_var("CARDSERVER_BOT_MIN_DELAY_MS");
        env::remove_var("CARDSERVER_BOT_MAX_DELAY_MS");
    }
}
