//! Agent connection settings

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`AgentConfig::agent_url`]
pub const ENV_AGENT_URL: &str = "UIPLAN_AGENT_URL";
/// Environment variable overriding [`AgentConfig::application_base_url`]
pub const ENV_BASE_URL: &str = "UIPLAN_BASE_URL";
/// Environment variable overriding [`AgentConfig::headless`]
pub const ENV_HEADLESS: &str = "UIPLAN_HEADLESS";

/// Interaction agent configuration
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the agent's HTTP endpoint
    pub agent_url: String,
    /// Base URL of the application the agent drives
    pub application_base_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Timeout of `wait` steps that do not set one, in milliseconds
    pub default_wait_timeout_ms: u64,
}

impl AgentConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With agent URL
    #[inline]
    #[must_use]
    pub fn with_agent_url(mut self, url: impl Into<String>) -> Self {
        self.agent_url = url.into();
        self
    }

    /// With application base URL
    #[inline]
    #[must_use]
    pub fn with_application_base_url(mut self, url: impl Into<String>) -> Self {
        self.application_base_url = url.into();
        self
    }

    /// With headless mode
    #[inline]
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With default wait timeout
    #[inline]
    #[must_use]
    pub fn with_default_wait_timeout_ms(mut self, ms: u64) -> Self {
        self.default_wait_timeout_ms = ms;
        self
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connection timeout
    #[inline]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed input
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, `ConfigError::Parse` if
    /// it is malformed
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply overrides read through `lookup`
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` if the headless override is not a boolean
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_AGENT_URL) {
            self.agent_url = url;
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.application_base_url = url;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.headless = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_HEADLESS.to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }

    /// Apply `UIPLAN_*` environment overrides
    ///
    /// # Errors
    /// See [`AgentConfig::apply_overrides_from`]
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_url: "http://localhost:3000".to_string(),
            application_base_url: "http://localhost:8080".to_string(),
            headless: true,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            default_wait_timeout_ms: 5000,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
