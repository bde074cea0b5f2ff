//! Configuration loader for the cerberus host
//!
//! Reads the configuration file (explicit path or `CERBERUS_CONFIG`), fills
//! the log level from `CERBERUS_LOG` when the file leaves it unset, and then
//! applies `key=value` parameters in order.

use crate::config::HostConfig;
use cerberus_core::{Error, Result, CERBERUS_CONFIG_VAR, CERBERUS_LOG_VAR};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Builder-style loader for [`HostConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file; `CERBERUS_CONFIG` when unset
    path: Option<PathBuf>,
    /// Raw `key=value` parameters, applied last
    overrides: Vec<String>,
    /// Whether to consult the environment
    read_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            path: None,
            overrides: Vec::new(),
            read_env: true,
        }
    }

    /// Load from `path`; a missing file is an error
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Append `key=value` parameters; a bare `key` sets the empty string
    pub fn overrides<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.extend(params.into_iter().map(Into::into));
        self
    }

    /// Set whether `CERBERUS_CONFIG` and `CERBERUS_LOG` are consulted
    pub fn read_env(mut self, read_env: bool) -> Self {
        self.read_env = read_env;
        self
    }

    /// Load the configuration
    pub fn load(self) -> Result<HostConfig> {
        let path = self
            .path
            .clone()
            .or_else(|| self.env_var(CERBERUS_CONFIG_VAR).map(PathBuf::from));

        let mut config = match path {
            Some(ref path) => Self::read_file(path)?,
            None => HostConfig::default(),
        };

        if config.log_level.is_none() {
            config.log_level = self.env_var(CERBERUS_LOG_VAR);
        }

        for raw in &self.overrides {
            let (key, value) = parse_param(raw);
            apply(&mut config, key, value)?;
        }

        if config.tick_seconds == 0 {
            return Err(Error::configuration("tick_seconds must be at least 1"));
        }

        debug!(
            path = ?path,
            plugins = config.plugins.len(),
            cron = config.cron.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        if !self.read_env {
            return None;
        }
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }

    fn read_file(path: &Path) -> Result<HostConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read configuration", e))?;
        serde_json::from_str(&content).map_err(|e| Error::Json {
            message: format!("invalid configuration in {}: {e}", path.display()),
            source: e,
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a parameter at its first `=`; a bare key yields an empty value
pub fn parse_param(raw: &str) -> (&str, &str) {
    raw.split_once('=').unwrap_or((raw, ""))
}

fn apply(config: &mut HostConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "" => return Err(Error::configuration(format!("parameter '{value}' has no name"))),
        "bot_id" => config.bot_id = parse_number(key, value)?,
        "tick_seconds" => config.tick_seconds = parse_number(key, value)?,
        "log_level" => {
            config.log_level = Some(value.to_string()).filter(|level| !level.is_empty())
        }
        "utc" => config.utc = parse_flag(key, value)?,
        "plugins" => {
            config.plugins = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        }
        _ => {
            config.extra.insert(key.to_string(), value.to_string());
        }
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::configuration(format!("parameter '{key}' expects a number, got '{value}'")))
}

// A bare flag turns the option on.
fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "parameter '{key}' expects true or false, got '{value}'"
        ))),
    }
}
