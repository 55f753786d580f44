//! Execution reconciliation tests
//!
//! Runner output of any length must come back as exactly one log entry per
//! planned step, in planned order.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use uiplan_core::{PlanStatus, StepType};
use uiplan_executor::{reconcile, PlanExecutor, StepOutcome, NOT_EXECUTED_MESSAGE};
use uiplan_test_utils::{building_plan, plan_with_steps, successes, ScriptedRunner};

fn outcome_strategy() -> impl Strategy<Value = StepOutcome> {
    (any::<bool>(), 0..10_000u64).prop_map(|(success, ms)| {
        if success {
            StepOutcome::succeeded(ms)
        } else {
            StepOutcome::failed("agent error", ms)
        }
    })
}

proptest! {
    #[test]
    fn prop_log_length_matches_plan(
        planned in 0..12usize,
        outcomes in proptest::collection::vec(outcome_strategy(), 0..16)
    ) {
        let plan = plan_with_steps(planned);
        let reported = outcomes.len();
        let entries = reconcile(&plan, outcomes.clone());

        prop_assert_eq!(entries.len(), planned);
        for (i, entry) in entries.iter().enumerate() {
            prop_assert_eq!(entry.step_index(), i);
            prop_assert_eq!(entry.step(), &plan.steps()[i]);
            if i < reported {
                prop_assert_eq!(entry.outcome(), &outcomes[i]);
            } else {
                prop_assert_eq!(entry.outcome(), &StepOutcome::not_executed());
            }
        }
    }

    #[test]
    fn prop_success_iff_every_entry_succeeded(
        planned in 0..8usize,
        outcomes in proptest::collection::vec(outcome_strategy(), 0..10)
    ) {
        let plan = plan_with_steps(planned);
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let result = runtime.block_on(
            PlanExecutor::new(Arc::new(ScriptedRunner::new(outcomes))).execute(&plan),
        );

        let all_ok = result.log_entries().iter().all(|e| e.outcome().success);
        prop_assert_eq!(result.success(), all_ok);
        prop_assert!(result.finished_at() >= result.started_at());
    }
}

#[tokio::test]
async fn full_success_scenario() {
    let plan = building_plan();
    let runner = Arc::new(ScriptedRunner::new(successes(5)));

    let result = PlanExecutor::new(runner.clone()).execute(&plan).await;

    assert!(result.success());
    assert_eq!(result.log_entries().len(), 5);
    assert_eq!(runner.calls(), 1);
    assert_eq!(runner.seen(), vec![plan.steps().to_vec()]);
    for (entry, step) in result.log_entries().iter().zip(plan.steps()) {
        assert_eq!(entry.step(), step);
        assert_eq!(entry.plan_id(), plan.id());
    }
}

#[tokio::test]
async fn agent_stopped_after_second_step() {
    let plan = building_plan();
    let runner = ScriptedRunner::new(vec![
        StepOutcome::succeeded(120),
        StepOutcome::failed("element not found", 80),
    ]);

    let result = PlanExecutor::new(Arc::new(runner)).execute(&plan).await;

    assert!(!result.success());
    assert_eq!(result.log_entries().len(), 5);
    assert_eq!(result.failed_steps(), vec![1, 2, 3, 4]);

    let entries = result.log_entries();
    assert_eq!(entries[1].outcome().error.as_deref(), Some("element not found"));
    for entry in &entries[2..] {
        assert_eq!(entry.outcome().error.as_deref(), Some(NOT_EXECUTED_MESSAGE));
        assert_eq!(entry.outcome().duration_ms, 0);
    }
    assert_eq!(entries[4].step().step_type(), StepType::Wait);
}

#[tokio::test]
async fn three_of_five_reported() {
    let plan = building_plan();
    let runner = ScriptedRunner::new(successes(3));

    let result = PlanExecutor::new(Arc::new(runner)).execute(&plan).await;

    assert!(!result.success());
    assert_eq!(result.log_entries().len(), 5);
    assert_eq!(result.failed_steps(), vec![3, 4]);
    assert_eq!(
        result.log_entries()[3].outcome(),
        &StepOutcome::failed(NOT_EXECUTED_MESSAGE, 0)
    );
}

#[tokio::test]
async fn surplus_outcomes_are_dropped() {
    let plan = building_plan();
    let runner = ScriptedRunner::new(successes(7));

    let result = PlanExecutor::new(Arc::new(runner)).execute(&plan).await;

    assert!(result.success());
    assert_eq!(result.log_entries().len(), 5);
    assert_eq!(result.log_entries()[4].step_index(), 4);
}

#[tokio::test]
async fn execution_leaves_plan_untouched() {
    let plan = building_plan();
    let before = plan.clone();

    PlanExecutor::new(Arc::new(ScriptedRunner::new(Vec::new())))
        .execute(&plan)
        .await;

    assert_eq!(plan, before);
    assert_eq!(plan.status(), PlanStatus::Created);
}

#[tokio::test]
async fn concurrent_executions_are_independent() {
    let runner = Arc::new(ScriptedRunner::new(successes(5)));
    let executor = PlanExecutor::new(runner.clone());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let executor = executor.clone();
        handles.push(tokio::spawn(async move {
            let plan = building_plan();
            let result = executor.execute(&plan).await;
            (plan.id(), result)
        }));
    }

    for handle in handles {
        let (plan_id, result) = handle.await.unwrap();
        assert_eq!(result.plan_id(), plan_id);
        assert!(result.success());
        assert!(result.log_entries().iter().all(|e| e.plan_id() == plan_id));
    }
    assert_eq!(runner.calls(), 8);
}

#[test]
fn result_serializes_with_log_entries() {
    let plan = plan_with_steps(2);
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let result = runtime.block_on(
        PlanExecutor::new(Arc::new(ScriptedRunner::new(successes(1)))).execute(&plan),
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], serde_json::Value::Bool(false));
    assert_eq!(json["log_entries"].as_array().map(Vec::len), Some(2));
}
