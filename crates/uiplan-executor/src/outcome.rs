//! Per-step outcome reported by a step runner

use serde::{Deserialize, Serialize};

/// Diagnostic of the synthetic failure recorded for steps the agent never reported on
pub const NOT_EXECUTED_MESSAGE: &str = "step was not executed by agent — no result returned";

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Whether the step succeeded
    pub success: bool,
    /// Informational message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Reference to a produced artifact (e.g. screenshot path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_ref: Option<String>,
}

impl StepOutcome {
    /// Successful outcome
    #[inline]
    #[must_use]
    pub fn succeeded(duration_ms: u64) -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            duration_ms,
            artifact_ref: None,
        }
    }

    /// Failed outcome
    #[inline]
    #[must_use]
    pub fn failed(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            duration_ms,
            artifact_ref: None,
        }
    }

    /// Synthetic failure for a step with no reported outcome
    #[inline]
    #[must_use]
    pub fn not_executed() -> Self {
        Self::failed(NOT_EXECUTED_MESSAGE, 0)
    }

    /// With message
    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// With artifact reference
    #[inline]
    #[must_use]
    pub fn with_artifact(mut self, artifact_ref: impl Into<String>) -> Self {
        self.artifact_ref = Some(artifact_ref.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_executed_is_zero_duration_failure() {
        let outcome = StepOutcome::not_executed();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some(NOT_EXECUTED_MESSAGE));
        assert_eq!(outcome.duration_ms, 0);
        assert!(outcome.artifact_ref.is_none());
    }

    #[test]
    fn success_builder() {
        let outcome = StepOutcome::succeeded(120)
            .with_message("clicked")
            .with_artifact("screenshots/step-1.png");
        assert!(outcome.success);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.artifact_ref.as_deref(), Some("screenshots/step-1.png"));
    }
}
