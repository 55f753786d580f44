//! uiplan Executor - plan execution and reconciliation
//!
//! Drives a [`Plan`](uiplan_core::Plan) through a [`StepRunner`] (the
//! interaction agent boundary) and turns whatever the runner reports into a
//! plan-shaped [`PlanExecutionResult`]: exactly one log entry per planned
//! step, in planned order.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use uiplan_executor::PlanExecutor;
//!
//! let executor = PlanExecutor::new(Arc::new(agent_service));
//! let result = executor.execute(&plan).await;
//! println!("success={} steps={}", result.success(), result.log_entries().len());
//! ```

#![warn(unreachable_pub)]

pub mod executor;
pub mod log;
pub mod outcome;
pub mod runner;

pub use executor::{reconcile, AttemptState, PlanExecutor};
pub use log::{ExecutionLogEntry, PlanExecutionResult};
pub use outcome::{StepOutcome, NOT_EXECUTED_MESSAGE};
pub use runner::StepRunner;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
