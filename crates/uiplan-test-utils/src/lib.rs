//! Testing utilities for uiplan workspace
//!
//! Shared fixtures (the "Building / order EGRN extract" catalog), plan
//! builders and a scripted step runner.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uiplan_core::{
    Action, EntityType, ExecutionRequest, InMemoryResolver, Plan, PlanStep, Planner, SelectorKind,
    UiBinding,
};
use uiplan_executor::{StepOutcome, StepRunner};

pub const BUILDING: &str = "Building";
pub const BUILDING_ID: &str = "93939";
pub const ORDER_EGRN_EXTRACT: &str = "order_egrn_extract";
pub const ORDER_EGRN_EXTRACT_SELECTOR: &str = "[data-action='order_egrn_extract']";

pub const CONTRACT: &str = "Contract";
pub const CLOSE_CONTRACT: &str = "close_contract";
pub const CLOSE_CONTRACT_SELECTOR: &str = "//button[@id='close-contract']";

/// Catalog with two entity types and two actions, each bound to a selector
pub fn building_resolver() -> InMemoryResolver {
    let resolver = InMemoryResolver::new();
    resolver.register_entity_type(EntityType::new(BUILDING, "Building"));
    resolver.register_entity_type(EntityType::new(CONTRACT, "Contract"));

    resolver.register_action(
        Action::new(ORDER_EGRN_EXTRACT, "Order EGRN extract")
            .with_description("Orders an extract from the state real estate register")
            .applicable_to(BUILDING),
    );
    resolver.register_action(Action::new(CLOSE_CONTRACT, "Close contract").applicable_to(CONTRACT));

    resolver.register_ui_binding(UiBinding::new(
        ORDER_EGRN_EXTRACT,
        ORDER_EGRN_EXTRACT_SELECTOR,
        SelectorKind::Css,
    ));
    resolver.register_ui_binding(UiBinding::new(
        CLOSE_CONTRACT,
        CLOSE_CONTRACT_SELECTOR,
        SelectorKind::XPath,
    ));
    resolver
}

pub fn building_request() -> ExecutionRequest {
    ExecutionRequest::new(BUILDING, BUILDING_ID, ORDER_EGRN_EXTRACT).unwrap()
}

pub fn building_planner() -> Planner {
    Planner::new(Arc::new(building_resolver()))
}

/// Five-step plan for the building fixture
pub fn building_plan() -> Plan {
    building_planner().create_plan(&building_request()).unwrap()
}

/// Plan with `n` explain steps
pub fn plan_with_steps(n: usize) -> Plan {
    let steps = (0..n)
        .map(|i| PlanStep::explain(format!("step {i}")))
        .collect();
    Plan::new(BUILDING, BUILDING_ID, ORDER_EGRN_EXTRACT, steps)
}

pub fn successes(n: usize) -> Vec<StepOutcome> {
    (0..n).map(|i| StepOutcome::succeeded(i as u64 * 10)).collect()
}

/// Step runner that replays a fixed outcome list and records every call
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outcomes: Vec<StepOutcome>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<PlanStep>>>,
}

impl ScriptedRunner {
    pub fn new(outcomes: Vec<StepOutcome>) -> Self {
        Self {
            outcomes,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Step lists received, one per call
    pub fn seen(&self) -> Vec<Vec<PlanStep>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StepRunner for ScriptedRunner {
    async fn run_plan(&self, steps: &[PlanStep]) -> Vec<StepOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(steps.to_vec());
        self.outcomes.clone()
    }
}
