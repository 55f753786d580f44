//! Plan steps to agent commands
//!
//! [`AgentService`] is the [`StepRunner`] backed by a live agent. A run opens
//! one browser context, then sends every step in order. Semantic
//! `action(<id>)` targets are resolved to concrete selectors here, at
//! execution time, through the same [`Resolver`] the planner used.

use crate::command::{AgentCommand, AgentResponse};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::transport::{elapsed_ms, AgentTransport, HttpAgentTransport};
use std::sync::Arc;
use std::time::Instant;
use uiplan_core::{PlanStep, Resolver, StepType};
use uiplan_executor::{StepOutcome, StepRunner};

/// Step parameter holding the text of a `type` step
pub const TEXT_PARAM: &str = "text";
/// Step parameter holding a `wait` timeout in milliseconds
pub const TIMEOUT_PARAM: &str = "timeout";

/// Interaction agent driven step by step
#[derive(Clone)]
pub struct AgentService {
    transport: Arc<dyn AgentTransport>,
    resolver: Arc<dyn Resolver>,
    config: AgentConfig,
}

impl std::fmt::Debug for AgentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AgentService {
    /// Create new service over a transport
    #[inline]
    #[must_use]
    pub fn new(
        transport: Arc<dyn AgentTransport>,
        resolver: Arc<dyn Resolver>,
        config: AgentConfig,
    ) -> Self {
        Self {
            transport,
            resolver,
            config,
        }
    }

    /// Create service talking HTTP to `config.agent_url`
    ///
    /// # Errors
    /// `AgentError::ClientBuild` if the HTTP client cannot be constructed
    pub fn http(config: AgentConfig, resolver: Arc<dyn Resolver>) -> Result<Self, AgentError> {
        let transport = HttpAgentTransport::new(&config)?;
        Ok(Self::new(Arc::new(transport), resolver, config))
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Whether the agent answers its health check
    pub async fn is_available(&self) -> bool {
        self.transport.is_available().await
    }

    /// Close the browser
    pub async fn close(&self) -> AgentResponse {
        let response = self.transport.close().await;
        if response.success {
            tracing::info!("agent closed");
        } else {
            tracing::error!(error = ?response.error, "failed to close agent");
        }
        response
    }

    /// Turn a plan step into the command sent to the agent
    ///
    /// # Errors
    /// `AgentError::InvalidStep` if a step lacks what its command needs
    /// (a target for element and navigation steps, text for `type`)
    pub fn to_command(&self, step: &PlanStep) -> Result<AgentCommand, AgentError> {
        let explanation = step.explanation().map(str::to_string);

        let command = match step.step_type() {
            StepType::OpenPage => AgentCommand::open_page(required_target(step)?, explanation),
            StepType::Click => AgentCommand::click(self.selector_for(step)?, explanation),
            StepType::Hover => AgentCommand::hover(self.selector_for(step)?, explanation),
            StepType::Highlight => AgentCommand::highlight(self.selector_for(step)?, explanation),
            StepType::Type => {
                let text = step
                    .parameters()
                    .get(TEXT_PARAM)
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| AgentError::InvalidStep("type step has no text".to_string()))?;
                AgentCommand::type_text(self.selector_for(step)?, text, explanation)
            }
            StepType::Wait => {
                let timeout = step
                    .parameters()
                    .get(TIMEOUT_PARAM)
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(self.config.default_wait_timeout_ms);
                AgentCommand::wait(step.target().map(str::to_string), explanation, timeout)
            }
            StepType::Explain => AgentCommand::explain(explanation),
            StepType::Screenshot => AgentCommand::screenshot(explanation),
        };

        Ok(command)
    }

    /// Concrete selector of an element step
    ///
    /// `action(<id>)` targets go through the action's UI binding; a missing
    /// binding falls back to the raw target.
    fn selector_for(&self, step: &PlanStep) -> Result<String, AgentError> {
        let target = required_target(step)?;

        let Some(action_id) = step.action_ref() else {
            return Ok(target.to_string());
        };

        match self.resolver.find_ui_binding(action_id) {
            Some(binding) => Ok(binding.selector().to_string()),
            None => {
                tracing::warn!(action = action_id, "no ui binding for action, using target as selector");
                Ok(target.to_string())
            }
        }
    }

    async fn run_step(&self, index: usize, step: &PlanStep) -> StepOutcome {
        let started = Instant::now();
        tracing::debug!(index, step_type = %step.step_type(), target = step.target(), "running step");

        let command = match self.to_command(step) {
            Ok(command) => command,
            Err(e) => {
                tracing::error!(index, error = %e, "step cannot be sent to agent");
                return StepOutcome::failed(e.to_string(), elapsed_ms(started));
            }
        };

        let response = self.transport.execute(&command).await;
        let duration_ms = elapsed_ms(started);

        if response.success {
            let mut outcome = StepOutcome::succeeded(duration_ms);
            if let Some(message) = &response.message {
                outcome = outcome.with_message(message.as_str());
            }
            if let Some(screenshot) = response.screenshot() {
                outcome = outcome.with_artifact(screenshot);
            }
            outcome
        } else {
            let error = response
                .error
                .unwrap_or_else(|| format!("{} step failed", step.step_type()));
            tracing::error!(index, %error, "step failed");
            StepOutcome::failed(error, duration_ms)
        }
    }
}

#[async_trait::async_trait]
impl StepRunner for AgentService {
    async fn run_plan(&self, steps: &[PlanStep]) -> Vec<StepOutcome> {
        let started = Instant::now();
        let init = self
            .transport
            .initialize(&self.config.application_base_url, self.config.headless)
            .await;

        if !init.success {
            let error = init
                .error
                .unwrap_or_else(|| "agent initialization failed".to_string());
            tracing::error!(%error, "failed to initialize agent");
            return vec![StepOutcome::failed(error, elapsed_ms(started))];
        }

        let mut outcomes = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            outcomes.push(self.run_step(index, step).await);
        }

        tracing::info!(
            steps = outcomes.len(),
            failed = outcomes.iter().filter(|o| !o.success).count(),
            "agent run completed"
        );
        outcomes
    }
}

fn required_target(step: &PlanStep) -> Result<&str, AgentError> {
    step.target()
        .ok_or_else(|| AgentError::InvalidStep(format!("{} step has no target", step.step_type())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandType;
    use crate::transport::MockAgentTransport;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use uiplan_core::{InMemoryResolver, Metadata, SelectorKind, UiBinding};

    fn resolver() -> Arc<InMemoryResolver> {
        let resolver = InMemoryResolver::new();
        resolver.register_ui_binding(UiBinding::new(
            "order",
            "[data-action='order']",
            SelectorKind::Css,
        ));
        Arc::new(resolver)
    }

    fn service(transport: MockAgentTransport) -> AgentService {
        AgentService::new(Arc::new(transport), resolver(), AgentConfig::new())
    }

    fn ok() -> AgentResponse {
        AgentResponse::success("ok", Metadata::new(), 1)
    }

    #[test]
    fn action_targets_resolve_to_bound_selector() {
        let service = service(MockAgentTransport::new());

        let command = service.to_command(&PlanStep::click("order", "Click")).unwrap();
        assert_eq!(command.command_type(), CommandType::Click);
        assert_eq!(command.target(), Some("[data-action='order']"));

        let command = service.to_command(&PlanStep::hover("order", "Hover")).unwrap();
        assert_eq!(command.target(), Some("[data-action='order']"));
    }

    #[test]
    fn unbound_action_falls_back_to_raw_target() {
        let service = service(MockAgentTransport::new());
        let command = service.to_command(&PlanStep::click("unknown", "Click")).unwrap();
        assert_eq!(command.target(), Some("action(unknown)"));
    }

    #[test]
    fn plain_selectors_pass_through() {
        let service = service(MockAgentTransport::new());
        let command = service
            .to_command(&PlanStep::highlight("#total", "Look here"))
            .unwrap();
        assert_eq!(command.command_type(), CommandType::Highlight);
        assert_eq!(command.target(), Some("#total"));
    }

    #[test]
    fn wait_timeout_defaults_from_config() {
        let service = service(MockAgentTransport::new());

        let command = service.to_command(&PlanStep::wait("result", "Waiting")).unwrap();
        assert_eq!(command.parameters().get(TIMEOUT_PARAM), Some(&serde_json::json!(5000)));

        let step = PlanStep::wait("result", "Waiting").with_parameter(TIMEOUT_PARAM, 750);
        let command = service.to_command(&step).unwrap();
        assert_eq!(command.parameters().get(TIMEOUT_PARAM), Some(&serde_json::json!(750)));
    }

    #[test]
    fn type_step_carries_text() {
        let service = service(MockAgentTransport::new());
        let command = service
            .to_command(&PlanStep::type_text("#search", "93939", "Search"))
            .unwrap();
        assert_eq!(command.command_type(), CommandType::Type);
        assert_eq!(command.parameters().get(TEXT_PARAM), Some(&serde_json::json!("93939")));
    }

    #[test]
    fn type_step_without_text_is_invalid() {
        let service = service(MockAgentTransport::new());
        let step = PlanStep::new(StepType::Type, Some("#search".into()), None);
        assert!(matches!(service.to_command(&step), Err(AgentError::InvalidStep(_))));
    }

    #[tokio::test]
    async fn init_failure_yields_single_outcome() {
        let mut transport = MockAgentTransport::new();
        transport
            .expect_initialize()
            .withf(|base_url, headless| base_url == "http://localhost:8080" && *headless)
            .times(1)
            .returning(|_, _| AgentResponse::failure("browser unavailable", 0));
        transport.expect_execute().never();

        let steps = vec![PlanStep::explain("a"), PlanStep::explain("b")];
        let outcomes = service(transport).run_plan(&steps).await;

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].error.as_deref(), Some("browser unavailable"));
    }

    #[tokio::test]
    async fn runs_every_step_in_order() {
        let mut seq = Sequence::new();
        let mut transport = MockAgentTransport::new();
        transport
            .expect_initialize()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| ok());
        transport
            .expect_execute()
            .withf(|c| c.command_type() == CommandType::OpenPage)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok());
        transport
            .expect_execute()
            .withf(|c| c.command_type() == CommandType::Click)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| AgentResponse::failure("element not found", 3));
        transport
            .expect_execute()
            .withf(|c| c.command_type() == CommandType::Screenshot)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                let mut data = Metadata::new();
                data.insert("screenshot".into(), "/tmp/shot.png".into());
                AgentResponse::success("captured", data, 4)
            });

        let steps = vec![
            PlanStep::open_page("/buildings/1", "Open"),
            PlanStep::click("order", "Click"),
            PlanStep::screenshot("Capture"),
        ];
        let outcomes = service(transport).run_plan(&steps).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert_eq!(outcomes[1].error.as_deref(), Some("element not found"));
        assert!(outcomes[2].success);
        assert_eq!(outcomes[2].artifact_ref.as_deref(), Some("/tmp/shot.png"));
        assert_eq!(outcomes[2].message.as_deref(), Some("captured"));
    }

    #[tokio::test]
    async fn unconvertible_step_fails_without_agent_call() {
        let mut transport = MockAgentTransport::new();
        transport.expect_initialize().returning(|_, _| ok());
        transport.expect_execute().never();

        let steps = vec![PlanStep::new(StepType::Click, None, None)];
        let outcomes = service(transport).run_plan(&steps).await;

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].error.as_deref().unwrap().contains("no target"));
    }

    #[tokio::test]
    async fn close_reports_agent_response() {
        let mut transport = MockAgentTransport::new();
        transport.expect_close().times(1).returning(ok);

        assert!(service(transport).close().await.success);
    }
}
