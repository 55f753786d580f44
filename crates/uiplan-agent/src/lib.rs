//! uiplan Agent - interaction agent client
//!
//! Connects the executor to a browser-driving agent process:
//! - [`AgentCommand`] / [`AgentResponse`]: JSON wire types
//! - [`AgentTransport`]: transport seam, [`HttpAgentTransport`] over `reqwest`
//! - [`AgentService`]: the [`StepRunner`](uiplan_executor::StepRunner) that
//!   turns plan steps into commands
//! - [`AgentConfig`]: connection settings (TOML file plus `UIPLAN_*` overrides)

#![warn(unreachable_pub)]

pub mod command;
pub mod config;
pub mod error;
pub mod service;
pub mod transport;

pub use command::{AgentCommand, AgentResponse, CommandType, SCREENSHOT_KEY};
pub use config::{AgentConfig, ENV_AGENT_URL, ENV_BASE_URL, ENV_HEADLESS};
pub use error::{AgentError, ConfigError};
pub use service::{AgentService, TEXT_PARAM, TIMEOUT_PARAM};
pub use transport::{AgentTransport, HttpAgentTransport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
