use std::env;

/// Application configuration loaded from environment variables.
/// Every knob has a default; no variable is required.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path.
    pub db_path: String,

    /// HTTP timeout for source adapters, in seconds.
    pub http_timeout_secs: u64,

    /// User-Agent header sent by source adapters.
    pub user_agent: String,

    /// Default minimum virality score for trending discovery.
    pub min_score: f64,

    /// Topics older than this are dropped by the curation pipeline.
    pub max_age_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("TRENDSCOUT_DB").unwrap_or_else(|_| "trendscout.db".to_string()),
            http_timeout_secs: parsed_env("TRENDSCOUT_HTTP_TIMEOUT_SECS", 30),
            user_agent: env::var("TRENDSCOUT_USER_AGENT")
                .unwrap_or_else(|_| "trendscout/0.1 (marketing research tool)".to_string()),
            min_score: parsed_env("TRENDSCOUT_MIN_SCORE", 30.0),
            max_age_hours: parsed_env("TRENDSCOUT_MAX_AGE_HOURS", 72),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "trendscout.db".to_string(),
            http_timeout_secs: 30,
            user_agent: "trendscout/0.1 (marketing research tool)".to_string(),
            min_score: 30.0,
            max_age_hours: 72,
        }
    }
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_usable() {
        let config = Config::default();
        assert_eq!(config.max_age_hours, 72);
        assert_eq!(config.min_score, 30.0);
        assert!(!config.user_agent.is_empty());
    }
}
