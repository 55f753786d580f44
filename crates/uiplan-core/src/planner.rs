//! Linear plan construction
//!
//! The planner validates a request against resolver metadata and emits the
//! fixed five-step template:
//! 1. `open_page` - open the entity page
//! 2. `explain` - narrate the action
//! 3. `hover` - point at the action's element
//! 4. `click` - trigger the action
//! 5. `wait` - wait for the result

use crate::domain::{Action, EntityType, ExecutionRequest};
use crate::error::PlanningError;
use crate::plan::{Plan, PlanStep};
use crate::resolver::Resolver;
use std::sync::Arc;

/// Wait condition of the final step
pub const RESULT_TARGET: &str = "result";

/// Entity type metadata key holding a page URL template with an `{id}` placeholder
pub const URL_TEMPLATE_KEY: &str = "url_template";

/// Builds linear execution plans
///
/// Stateless apart from the injected resolver; independent calls may run in
/// parallel.
#[derive(Clone)]
pub struct Planner {
    resolver: Arc<dyn Resolver>,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner").finish_non_exhaustive()
    }
}

impl Planner {
    /// Create new planner over a resolver
    #[inline]
    #[must_use]
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }

    /// Resolver this planner reads from
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &Arc<dyn Resolver> {
        &self.resolver
    }

    /// Build the execution plan for a request
    ///
    /// # Errors
    /// Checked in this order, first failure wins:
    /// - `PlanningError::UnknownEntityType`
    /// - `PlanningError::UnknownAction`
    /// - `PlanningError::ActionNotApplicable`
    /// - `PlanningError::MissingUiBinding`
    pub fn create_plan(&self, request: &ExecutionRequest) -> Result<Plan, PlanningError> {
        let entity_type = self
            .resolver
            .find_entity_type(request.entity_type_id())
            .ok_or_else(|| PlanningError::UnknownEntityType(request.entity_type_id().to_string()))?;

        let action = self
            .resolver
            .find_action(request.action_id())
            .ok_or_else(|| PlanningError::UnknownAction(request.action_id().to_string()))?;

        if !action.is_applicable_to(entity_type.id()) {
            return Err(PlanningError::ActionNotApplicable {
                action_id: action.id().to_string(),
                entity_type_id: entity_type.id().to_string(),
            });
        }

        // Validated here, resolved to a selector only when a step runs
        if self.resolver.find_ui_binding(action.id()).is_none() {
            return Err(PlanningError::MissingUiBinding(action.id().to_string()));
        }

        let steps = linear_steps(&entity_type, &action, request.entity_id());
        let plan = Plan::new(entity_type.id(), request.entity_id(), action.id(), steps);

        tracing::info!(
            plan_id = %plan.id(),
            entity_type = plan.entity_type_id(),
            entity_id = plan.entity_id(),
            action = plan.action_id(),
            steps = plan.steps().len(),
            "plan created"
        );

        Ok(plan)
    }
}

fn linear_steps(entity_type: &EntityType, action: &Action, entity_id: &str) -> Vec<PlanStep> {
    let name = action.display_name();

    let explanation = action
        .description()
        .map_or_else(|| format!("Performing: {name}"), str::to_string);

    vec![
        PlanStep::open_page(
            entity_page_url(entity_type, entity_id),
            format!("Opening {} #{entity_id}", entity_type.display_name()),
        ),
        PlanStep::explain(explanation),
        PlanStep::hover(
            action.id(),
            format!("Pointing at the '{name}' action element"),
        ),
        PlanStep::click(action.id(), format!("Triggering '{name}'")),
        PlanStep::wait(
            RESULT_TARGET,
            format!("Waiting for '{name}' to complete"),
        ),
    ]
}

/// Page URL of an entity instance
///
/// Uses the entity type's `url_template` metadata when present (`{id}` is
/// replaced by the entity id), otherwise `/<lower-cased type id>s/<entity id>`.
#[must_use]
pub fn entity_page_url(entity_type: &EntityType, entity_id: &str) -> String {
    match entity_type.metadata_str(URL_TEMPLATE_KEY) {
        Some(template) => template.replace("{id}", entity_id),
        None => format!("/{}s/{entity_id}", entity_type.id().to_lowercase()),
    }
}
