//! Agent wire protocol
//!
//! JSON bodies exchanged with the interaction agent: one [`AgentCommand`]
//! per step, one [`AgentResponse`] back.

use serde::{Deserialize, Serialize};
use uiplan_core::Metadata;

/// Response data key holding a screenshot path
pub const SCREENSHOT_KEY: &str = "screenshot";

/// Command kind understood by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    /// Navigate to a URL (absolute, or relative to the application base URL)
    OpenPage,
    /// Click a selector
    Click,
    /// Type text into a selector
    Type,
    /// Hover over a selector
    Hover,
    /// Wait for a condition or selector
    Wait,
    /// Show an explanation to the viewer
    Explain,
    /// Highlight a selector
    Highlight,
    /// Capture the page
    Screenshot,
}

/// Single command sent to `POST /execute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCommand {
    #[serde(rename = "type")]
    command_type: CommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default)]
    parameters: Metadata,
}

impl AgentCommand {
    /// Create new command
    #[inline]
    #[must_use]
    pub fn new(command_type: CommandType, target: Option<String>, explanation: Option<String>) -> Self {
        Self {
            command_type,
            target,
            explanation,
            parameters: Metadata::new(),
        }
    }

    /// With command parameter
    #[inline]
    #[must_use]
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Navigate to `url`
    #[must_use]
    pub fn open_page(url: impl Into<String>, explanation: Option<String>) -> Self {
        Self::new(CommandType::OpenPage, Some(url.into()), explanation)
    }

    /// Click `selector`
    #[must_use]
    pub fn click(selector: impl Into<String>, explanation: Option<String>) -> Self {
        Self::new(CommandType::Click, Some(selector.into()), explanation)
    }

    /// Hover over `selector`
    #[must_use]
    pub fn hover(selector: impl Into<String>, explanation: Option<String>) -> Self {
        Self::new(CommandType::Hover, Some(selector.into()), explanation)
    }

    /// Type `text` into `selector`
    #[must_use]
    pub fn type_text(
        selector: impl Into<String>,
        text: impl Into<String>,
        explanation: Option<String>,
    ) -> Self {
        Self::new(CommandType::Type, Some(selector.into()), explanation)
            .with_parameter("text", text.into())
    }

    /// Wait for `condition` (page load when absent)
    #[must_use]
    pub fn wait(condition: Option<String>, explanation: Option<String>, timeout_ms: u64) -> Self {
        Self::new(CommandType::Wait, condition, explanation).with_parameter("timeout", timeout_ms)
    }

    /// Show an explanation
    #[must_use]
    pub fn explain(explanation: Option<String>) -> Self {
        Self::new(CommandType::Explain, None, explanation)
    }

    /// Highlight `selector`
    #[must_use]
    pub fn highlight(selector: impl Into<String>, explanation: Option<String>) -> Self {
        Self::new(CommandType::Highlight, Some(selector.into()), explanation)
    }

    /// Capture the page
    #[must_use]
    pub fn screenshot(explanation: Option<String>) -> Self {
        Self::new(CommandType::Screenshot, None, explanation)
    }

    /// Command kind
    #[inline]
    #[must_use]
    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    /// Selector, URL or wait condition
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Explanation shown while the command runs
    #[inline]
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Command parameters
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &Metadata {
        &self.parameters
    }
}

/// Agent reply to any endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    /// Whether the command succeeded
    pub success: bool,
    /// Informational message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Command-specific payload
    #[serde(default)]
    pub data: Metadata,
    /// Time spent by the agent
    #[serde(default)]
    pub execution_time_ms: u64,
}

impl AgentResponse {
    /// Successful response
    #[must_use]
    pub fn success(message: impl Into<String>, data: Metadata, execution_time_ms: u64) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            data,
            execution_time_ms,
        }
    }

    /// Failed response
    #[must_use]
    pub fn failure(error: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            data: Metadata::new(),
            execution_time_ms,
        }
    }

    /// Screenshot path reported in `data`
    #[must_use]
    pub fn screenshot(&self) -> Option<&str> {
        self.data.get(SCREENSHOT_KEY).and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_wire_format() {
        let command = AgentCommand::wait(Some("result".into()), Some("Waiting".into()), 5000);
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "type": "WAIT",
                "target": "result",
                "explanation": "Waiting",
                "parameters": {"timeout": 5000}
            })
        );
    }

    #[test]
    fn explain_has_no_target() {
        let value = serde_json::to_value(AgentCommand::explain(Some("hi".into()))).unwrap();
        assert_eq!(value["type"], "EXPLAIN");
        assert!(value.get("target").is_none());
    }

    #[test]
    fn response_reads_camel_case_and_defaults() {
        let response: AgentResponse = serde_json::from_value(json!({
            "success": true,
            "message": "Clicked",
            "data": {"screenshot": "/tmp/step-1.png"},
            "executionTimeMs": 42
        }))
        .unwrap();

        assert!(response.success);
        assert_eq!(response.execution_time_ms, 42);
        assert_eq!(response.screenshot(), Some("/tmp/step-1.png"));

        let minimal: AgentResponse = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(minimal.data.is_empty());
        assert_eq!(minimal.execution_time_ms, 0);
    }

    #[test]
    fn failure_carries_error_only() {
        let response = AgentResponse::failure("boom", 7);
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("boom"));
        assert!(response.message.is_none());
        assert!(response.screenshot().is_none());
    }
}
