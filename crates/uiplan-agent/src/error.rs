//! Agent client errors
//!
//! Step and transport failures are reported as failed responses, not as
//! errors; these types only cover setup and step conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Agent client error
#[derive(Error, Debug)]
pub enum AgentError {
    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Step cannot be turned into an agent command
    #[error("invalid step: {0}")]
    InvalidStep(String),
}

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`AgentConfig`](crate::AgentConfig)
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Override value has the wrong shape
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Setting name
        key: String,
        /// Rejected value
        value: String,
    },
}
