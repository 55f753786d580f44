//! Plan and plan step value objects
//!
//! A plan is data, not code: it is stored, serialized and replayed. Steps
//! are kept in insertion order and that order is the execution order.

use crate::error::ParseStepTypeError;
use crate::types::{Metadata, PlanId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const ACTION_TARGET_PREFIX: &str = "action(";
const ACTION_TARGET_SUFFIX: &str = ")";

/// Encode a semantic action reference as a step target: `action(<id>)`
#[inline]
#[must_use]
pub fn action_target(action_id: &str) -> String {
    format!("{ACTION_TARGET_PREFIX}{action_id}{ACTION_TARGET_SUFFIX}")
}

/// Fixed vocabulary of interaction steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// Navigate to a page
    OpenPage,
    /// Narrate what is about to happen
    Explain,
    /// Move the pointer over an element
    Hover,
    /// Click an element
    Click,
    /// Type text into an element
    Type,
    /// Wait for a condition
    Wait,
    /// Visually highlight an element
    Highlight,
    /// Capture the screen
    Screenshot,
}

impl StepType {
    /// All step types
    pub const ALL: [StepType; 8] = [
        StepType::OpenPage,
        StepType::Explain,
        StepType::Hover,
        StepType::Click,
        StepType::Type,
        StepType::Wait,
        StepType::Highlight,
        StepType::Screenshot,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            StepType::OpenPage => "open_page",
            StepType::Explain => "explain",
            StepType::Hover => "hover",
            StepType::Click => "click",
            StepType::Type => "type",
            StepType::Wait => "wait",
            StepType::Highlight => "highlight",
            StepType::Screenshot => "screenshot",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepType {
    type Err = ParseStepTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseStepTypeError(s.to_string()))
    }
}

/// Single interaction step
///
/// Examples:
/// - `open_page` → `/buildings/93939`
/// - `hover` → `action(order_egrn_extract)`
/// - `wait` → `result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    #[serde(rename = "type")]
    step_type: StepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    parameters: Metadata,
}

impl PlanStep {
    /// Create new step
    #[inline]
    #[must_use]
    pub fn new(step_type: StepType, target: Option<String>, explanation: Option<String>) -> Self {
        Self {
            step_type,
            target,
            explanation,
            parameters: Metadata::new(),
        }
    }

    /// With step parameter
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
    pub fn open_page(url: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(StepType::OpenPage, Some(url.into()), Some(explanation.into()))
    }

    /// Narrate `message`
    #[must_use]
    pub fn explain(message: impl Into<String>) -> Self {
        Self::new(StepType::Explain, None, Some(message.into()))
    }

    /// Hover over the element bound to `action_id`
    #[must_use]
    pub fn hover(action_id: &str, explanation: impl Into<String>) -> Self {
        Self::new(
            StepType::Hover,
            Some(action_target(action_id)),
            Some(explanation.into()),
        )
    }

    /// Click the element bound to `action_id`
    #[must_use]
    pub fn click(action_id: &str, explanation: impl Into<String>) -> Self {
        Self::new(
            StepType::Click,
            Some(action_target(action_id)),
            Some(explanation.into()),
        )
    }

    /// Wait for `condition`
    #[must_use]
    pub fn wait(condition: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(StepType::Wait, Some(condition.into()), Some(explanation.into()))
    }

    /// Type `text` into `selector`
    #[must_use]
    pub fn type_text(
        selector: impl Into<String>,
        text: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self::new(StepType::Type, Some(selector.into()), Some(explanation.into()))
            .with_parameter("text", text.into())
    }

    /// Highlight `selector`
    #[must_use]
    pub fn highlight(selector: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(
            StepType::Highlight,
            Some(selector.into()),
            Some(explanation.into()),
        )
    }

    /// Capture the screen
    #[must_use]
    pub fn screenshot(explanation: impl Into<String>) -> Self {
        Self::new(StepType::Screenshot, None, Some(explanation.into()))
    }

    /// Step type
    #[inline]
    #[must_use]
    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    /// Target (URL, selector, `action(<id>)` or wait condition)
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Human-readable explanation
    #[inline]
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Step parameters
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &Metadata {
        &self.parameters
    }

    /// Action id if the target is a semantic `action(<id>)` reference
    #[must_use]
    pub fn action_ref(&self) -> Option<&str> {
        self.target
            .as_deref()?
            .strip_prefix(ACTION_TARGET_PREFIX)?
            .strip_suffix(ACTION_TARGET_SUFFIX)
            .filter(|id| !id.is_empty())
    }
}

/// Plan lifecycle status
///
/// The core only ever produces `Created`; the other transitions belong to
/// whatever orchestrates execution and are applied with [`Plan::with_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Freshly built
    #[default]
    Created,
    /// Being executed
    Executing,
    /// Executed successfully
    Completed,
    /// Execution failed
    Failed,
    /// Abandoned before completion
    Cancelled,
}

impl PlanStatus {
    /// Check if no further transitions are expected
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Ordered, immutable list of steps realizing one action on one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    id: PlanId,
    entity_type_id: String,
    entity_id: String,
    action_id: String,
    steps: Vec<PlanStep>,
    status: PlanStatus,
}

impl Plan {
    /// Create new plan with a fresh id in `Created` status
    #[must_use]
    pub fn new(
        entity_type_id: impl Into<String>,
        entity_id: impl Into<String>,
        action_id: impl Into<String>,
        steps: Vec<PlanStep>,
    ) -> Self {
        Self::from_parts(
            PlanId::new(),
            entity_type_id,
            entity_id,
            action_id,
            steps,
            PlanStatus::Created,
        )
    }

    /// Rebuild a plan from stored parts
    #[must_use]
    pub fn from_parts(
        id: PlanId,
        entity_type_id: impl Into<String>,
        entity_id: impl Into<String>,
        action_id: impl Into<String>,
        steps: Vec<PlanStep>,
        status: PlanStatus,
    ) -> Self {
        Self {
            id,
            entity_type_id: entity_type_id.into(),
            entity_id: entity_id.into(),
            action_id: action_id.into(),
            steps,
            status,
        }
    }

    /// Same plan (id and steps) with a different status
    #[must_use]
    pub fn with_status(&self, status: PlanStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Plan id
    #[inline]
    #[must_use]
    pub fn id(&self) -> PlanId {
        self.id
    }

    /// Target entity type
    #[inline]
    #[must_use]
    pub fn entity_type_id(&self) -> &str {
        &self.entity_type_id
    }

    /// Target entity instance
    #[inline]
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Realized action
    #[inline]
    #[must_use]
    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Lifecycle status
    #[inline]
    #[must_use]
    pub fn status(&self) -> PlanStatus {
        self.status
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Plan {} ({} {} / {}, {} steps, {:?})",
            self.id,
            self.entity_type_id,
            self.entity_id,
            self.action_id,
            self.steps.len(),
            self.status
        )
    }
}
