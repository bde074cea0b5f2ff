//! The immutable host configuration
//!
//! Every field has a default, so `{}` is a complete configuration file.

use cerberus_core::{DEFAULT_CRON_METHOD, DEFAULT_LOG_LEVEL, DEFAULT_TICK_SECONDS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Configuration for one running host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Identifier of this bot instance
    pub bot_id: u32,

    /// Log filter; falls back to `CERBERUS_LOG` and then to `info`
    pub log_level: Option<String>,

    /// Plugins loaded on start, in order
    pub plugins: Vec<String>,

    /// Jobs scheduled on start
    pub cron: Vec<CronEntry>,

    /// Seconds between clock ticks
    pub tick_seconds: u64,

    /// Evaluate cron schedules in UTC instead of local time
    pub utc: bool,

    /// Parameters without a dedicated field
    pub extra: BTreeMap<String, String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bot_id: 0,
            log_level: None,
            plugins: Vec::new(),
            cron: Vec::new(),
            tick_seconds: DEFAULT_TICK_SECONDS,
            utc: false,
            extra: BTreeMap::new(),
        }
    }
}

impl HostConfig {
    /// The effective log level
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Look up a free-form parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.extra.get(name).map(String::as_str)
    }
}

/// A job scheduled when the host starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CronEntry {
    /// Five-field cron expression
    pub expression: String,

    /// Name of the callable component to run
    pub target: String,

    #[serde(default = "default_method")]
    pub method: String,

    /// Passed to the method as its only argument
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

fn default_method() -> String {
    DEFAULT_CRON_METHOD.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_valid() {
        let config: HostConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.tick_seconds, 60);
    }

    #[test]
    fn test_cron_entry_defaults() {
        let entry: CronEntry =
            serde_json::from_str(r#"{"expression": "*/5 * * * *", "target": "clock"}"#).unwrap();
        assert_eq!(entry.method, "run");
        assert_eq!(entry.params, None);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_str::<HostConfig>(r#"{"plugin": ["echo"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_param_lookup() {
        let mut config = HostConfig::default();
        config.extra.insert("channel".into(), "#cerberus".into());
        assert_eq!(config.param("channel"), Some("#cerberus"));
        assert_eq!(config.param("server"), None);
    }
}
