//! Plan executor
//!
//! One execution attempt walks `NotStarted -> Dispatched -> Reconciled -> Done`.
//! The runner is called exactly once; its outcomes are then aligned with the
//! plan so the log always holds one entry per planned step.

use crate::log::{ExecutionLogEntry, PlanExecutionResult};
use crate::outcome::StepOutcome;
use crate::runner::StepRunner;
use chrono::Utc;
use std::sync::Arc;
use uiplan_core::Plan;

/// Lifecycle of a single execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptState {
    /// Nothing sent to the runner yet
    NotStarted,
    /// Steps handed to the runner
    Dispatched,
    /// Outcomes aligned with the plan
    Reconciled,
    /// Result assembled
    Done,
}

impl AttemptState {
    /// Next state; `Done` is terminal
    #[inline]
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            Self::NotStarted => Self::Dispatched,
            Self::Dispatched => Self::Reconciled,
            Self::Reconciled | Self::Done => Self::Done,
        }
    }
}

/// Executes plans through a step runner
#[derive(Clone)]
pub struct PlanExecutor {
    runner: Arc<dyn StepRunner>,
}

impl std::fmt::Debug for PlanExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanExecutor").finish_non_exhaustive()
    }
}

impl PlanExecutor {
    /// Create new executor
    #[inline]
    #[must_use]
    pub fn new(runner: Arc<dyn StepRunner>) -> Self {
        Self { runner }
    }

    /// Execute a plan
    ///
    /// Never fails: runner failures show up as failed log entries. The plan is
    /// not modified; status transitions belong to the caller.
    pub async fn execute(&self, plan: &Plan) -> PlanExecutionResult {
        let started_at = Utc::now();
        let mut state = AttemptState::NotStarted;

        tracing::info!(
            plan_id = %plan.id(),
            steps = plan.steps().len(),
            "plan execution started"
        );

        state = transition(plan, state);
        let outcomes = self.runner.run_plan(plan.steps()).await;

        state = transition(plan, state);
        let log_entries = reconcile(plan, outcomes);

        let result = PlanExecutionResult::new(plan.id(), started_at, Utc::now(), log_entries);
        transition(plan, state);

        tracing::info!(
            plan_id = %plan.id(),
            success = result.success(),
            failed = result.failed_steps().len(),
            duration_ms = result.duration().num_milliseconds(),
            "plan execution finished"
        );

        result
    }
}

fn transition(plan: &Plan, from: AttemptState) -> AttemptState {
    let to = from.advance();
    tracing::debug!(plan_id = %plan.id(), ?from, ?to, "execution attempt state");
    to
}

/// Align runner outcomes with the plan's steps
///
/// Outcome `i` belongs to step `i`. Steps without an outcome get a synthetic
/// [`StepOutcome::not_executed`] failure; outcomes beyond the last step are
/// dropped. The result always has `plan.steps().len()` entries.
#[must_use]
pub fn reconcile(plan: &Plan, outcomes: Vec<StepOutcome>) -> Vec<ExecutionLogEntry> {
    let planned = plan.steps().len();
    let reported = outcomes.len();

    if reported < planned {
        tracing::warn!(
            plan_id = %plan.id(),
            planned,
            reported,
            "agent reported fewer outcomes than planned steps"
        );
    } else if reported > planned {
        tracing::warn!(
            plan_id = %plan.id(),
            planned,
            reported,
            "agent reported more outcomes than planned steps, extras dropped"
        );
    }

    let mut outcomes = outcomes.into_iter();
    plan.steps()
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let outcome = outcomes.next().unwrap_or_else(StepOutcome::not_executed);
            ExecutionLogEntry::new(plan.id(), index, step.clone(), outcome, Utc::now())
        })
        .collect()
}
