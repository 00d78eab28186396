use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    cache::DEFAULT_STALE_AFTER_SECS,
    debounce::DEFAULT_QUIET_PERIOD_MS,
};
use crate::api::client::DEFAULT_API_BASE;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base: String,
    pub debounce_ms: u64,
    pub stale_after_secs: u64,
    /// Maximum cached pages per resource kind; `None` keeps every page.
    pub cache_capacity: Option<usize>,
    /// Cap on concurrent related-entity requests; `None` fetches a whole list at once.
    pub fan_out_limit: Option<usize>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            debounce_ms: DEFAULT_QUIET_PERIOD_MS,
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
            cache_capacity: Some(256),
            fan_out_limit: None,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "api_base": "http://localhost:8080/api" }"#).unwrap();
        assert_eq!(settings.api_base, "http://localhost:8080/api");
        assert_eq!(settings.debounce(), Duration::from_millis(500));
        assert_eq!(settings.stale_after(), Duration::from_secs(60));
        assert_eq!(settings.cache_capacity, Some(256));
        assert_eq!(settings.fan_out_limit, None);
    }

    #[test]
    fn test_fan_out_limit_is_optional() {
        let settings: Settings = serde_json::from_str(r#"{ "fan_out_limit": 8 }"#).unwrap();
        assert_eq!(settings.fan_out_limit, Some(8));
    }

    #[test]
    fn test_unbounded_cache_is_null() {
        let settings: Settings = serde_json::from_str(r#"{ "cache_capacity": null }"#).unwrap();
        assert_eq!(settings.cache_capacity, None);
    }
}
