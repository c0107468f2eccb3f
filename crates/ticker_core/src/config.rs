//! Runtime configuration, `.env` / environment driven.

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Club whose games the ticker follows.
    pub club_id: i64,
    /// List endpoint; detail is `{base_url}{id}`.
    pub base_url: String,
    /// Status token marking a running game ("RUNNING" on the club feed,
    /// "LIVE" on some mirrors).
    pub live_status: String,
    /// Cadence with no game running, minutes past the hour.
    pub poll_interval_mins: u32,
    /// Cadence while a game runs.
    pub live_poll_interval_mins: u32,
    /// JSONL event log directory.
    pub log_dir: String,
    /// ntfy topic for goal pushes; `None` disables push alerts.
    pub ntfy_topic: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            club_id: 6, // Adler Mannheim
            base_url: "https://www.adler-mannheim.de/jsonapi/game/".to_string(),
            live_status: "RUNNING".to_string(),
            poll_interval_mins: 30,
            live_poll_interval_mins: 1,
            log_dir: "logs".to_string(),
            ntfy_topic: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            club_id: env_parse("ADLER_CLUB_ID", defaults.club_id),
            base_url: env::var("TICKER_BASE_URL").unwrap_or(defaults.base_url),
            live_status: env::var("TICKER_LIVE_STATUS").unwrap_or(defaults.live_status),
            poll_interval_mins: env_parse("TICKER_POLL_INTERVAL_MINS", defaults.poll_interval_mins),
            live_poll_interval_mins: env_parse(
                "TICKER_LIVE_POLL_INTERVAL_MINS",
                defaults.live_poll_interval_mins,
            ),
            log_dir: env::var("TICKER_LOG_DIR").unwrap_or(defaults.log_dir),
            ntfy_topic: env::var("TICKER_NTFY_TOPIC").ok().filter(|t| !t.is_empty()),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.club_id, 6);
        assert_eq!(config.live_status, "RUNNING");
        assert_eq!(config.poll_interval_mins, 30);
        assert_eq!(config.live_poll_interval_mins, 1);
        assert!(config.ntfy_topic.is_none());
    }

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        env::set_var("ADLERTICKER_TEST_BOGUS", "not-a-number");
        assert_eq!(env_parse("ADLERTICKER_TEST_BOGUS", 30u32), 30);
        env::remove_var("ADLERTICKER_TEST_BOGUS");
        assert_eq!(env_parse("ADLERTICKER_TEST_MISSING", 7u32), 7);
    }
}
