use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// PRs where a review was requested from the user, plus PRs they already
/// reviewed (those come back when new commits land).
pub fn default_queries() -> Vec<String> {
    vec![
        "is:open is:pr user-review-requested:@me".to_string(),
        "is:open is:pr reviewed-by:@me".to_string(),
    ]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    #[serde(with = "humantime_field")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_field")]
    pub request_timeout: Duration,
    pub api_url: String,
    pub queries: Vec<String>,
    pub per_page: u8,
    pub max_concurrent_lookups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            api_url: DEFAULT_API_URL.to_string(),
            queries: default_queries(),
            per_page: 100,
            max_concurrent_lookups: 4,
        }
    }
}

/// Durations are written the human way in the config file ("5s", "1m 30s").
mod humantime_field {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
    }
}
