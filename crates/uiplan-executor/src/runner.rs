//! Interaction agent boundary

use crate::outcome::StepOutcome;
use uiplan_core::PlanStep;

/// Runs an ordered list of steps against a live UI
///
/// Implement this trait to plug in an interaction agent. The returned list
/// must follow the order of `steps`; it may be shorter (the agent stopped
/// early) or longer than `steps`, the executor reconciles either case.
/// Step failures are reported as failed outcomes, never as errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StepRunner: Send + Sync {
    /// Run all steps and report one outcome per step attempted
    async fn run_plan(&self, steps: &[PlanStep]) -> Vec<StepOutcome>;
}
