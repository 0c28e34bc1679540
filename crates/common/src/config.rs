//! Application configuration

use std::env;
use std::str::FromStr;

use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// GitHub caps `per_page` on the events endpoint at 100
pub const MAX_EVENTS_PER_PAGE: u32 = 100;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_base_url: String,
    /// Upper bound on lines in an activity summary
    pub max_results: usize,
    pub events_per_page: u32,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_results: 10,
            events_per_page: 30,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            api_base_url: env::var("GITHUB_API_URL")
                .ok()
                .filter(|u| !u.is_empty())
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            max_results: parse_var("ACTIVITY_MAX_RESULTS").unwrap_or(defaults.max_results),
            events_per_page: parse_var("GITHUB_EVENTS_PER_PAGE")
                .unwrap_or(defaults.events_per_page)
                .clamp(1, MAX_EVENTS_PER_PAGE),
            request_timeout_secs: parse_var("HTTP_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}, using default", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert_eq!(config.max_results, 10);
        assert_eq!(config.events_per_page, 30);
        assert!(config.github_token.is_none());
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("COMMON_TEST_PARSE_VAR", "not-a-number");
        assert_eq!(parse_var::<usize>("COMMON_TEST_PARSE_VAR"), None);

        env::set_var("COMMON_TEST_PARSE_VAR", " 25 ");
        assert_eq!(parse_var::<usize>("COMMON_TEST_PARSE_VAR"), Some(25));

        env::remove_var("COMMON_TEST_PARSE_VAR");
        assert_eq!(parse_var::<usize>("COMMON_TEST_PARSE_VAR"), None);
    }
}
