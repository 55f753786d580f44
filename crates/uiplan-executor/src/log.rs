//! Execution log and aggregated result

use crate::outcome::StepOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uiplan_core::{PlanId, PlanStep};

/// One execution log record: a planned step paired with its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    plan_id: PlanId,
    step_index: usize,
    step: PlanStep,
    outcome: StepOutcome,
    logged_at: DateTime<Utc>,
}

impl ExecutionLogEntry {
    /// Create new log entry
    #[inline]
    #[must_use]
    pub fn new(
        plan_id: PlanId,
        step_index: usize,
        step: PlanStep,
        outcome: StepOutcome,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            plan_id,
            step_index,
            step,
            outcome,
            logged_at,
        }
    }

    /// Executed plan
    #[inline]
    #[must_use]
    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    /// Position of the step in the plan (0-based)
    #[inline]
    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Planned step
    #[inline]
    #[must_use]
    pub fn step(&self) -> &PlanStep {
        &self.step
    }

    /// Reported or synthesized outcome
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> &StepOutcome {
        &self.outcome
    }

    /// Record time
    #[inline]
    #[must_use]
    pub fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }

    /// Whether the step succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.success
    }
}

/// Aggregated result of one execution attempt
///
/// Deserialization goes through [`PlanExecutionResult::new`]; a stored
/// `success` flag is ignored and recomputed from the entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlanExecutionResult")]
pub struct PlanExecutionResult {
    plan_id: PlanId,
    success: bool,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    log_entries: Vec<ExecutionLogEntry>,
}

#[derive(Deserialize)]
struct RawPlanExecutionResult {
    plan_id: PlanId,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    #[serde(default)]
    log_entries: Vec<ExecutionLogEntry>,
}

impl From<RawPlanExecutionResult> for PlanExecutionResult {
    fn from(raw: RawPlanExecutionResult) -> Self {
        Self::new(raw.plan_id, raw.started_at, raw.finished_at, raw.log_entries)
    }
}

impl PlanExecutionResult {
    /// Assemble a result
    ///
    /// `success` is derived from the entries (an empty log is successful) and
    /// `finished_at` is never earlier than `started_at`.
    #[must_use]
    pub fn new(
        plan_id: PlanId,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        log_entries: Vec<ExecutionLogEntry>,
    ) -> Self {
        let success = log_entries.iter().all(ExecutionLogEntry::is_success);
        Self {
            plan_id,
            success,
            started_at,
            finished_at: finished_at.max(started_at),
            log_entries,
        }
    }

    /// Executed plan
    #[inline]
    #[must_use]
    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    /// True iff every step succeeded
    #[inline]
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Attempt start
    #[inline]
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Attempt end
    #[inline]
    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Wall-clock duration of the attempt
    #[inline]
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Log entries in plan order
    #[inline]
    #[must_use]
    pub fn log_entries(&self) -> &[ExecutionLogEntry] {
        &self.log_entries
    }

    /// Raw step outcomes in plan order
    pub fn step_outcomes(&self) -> impl Iterator<Item = &StepOutcome> + '_ {
        self.log_entries.iter().map(ExecutionLogEntry::outcome)
    }

    /// Indices of failed steps
    #[must_use]
    pub fn failed_steps(&self) -> Vec<usize> {
        self.log_entries
            .iter()
            .filter(|entry| !entry.is_success())
            .map(ExecutionLogEntry::step_index)
            .collect()
    }
}
