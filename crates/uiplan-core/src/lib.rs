//! uiplan Core - metadata resolution and plan construction
//!
//! Turns an abstract request ("perform action A on entity E of type T") into
//! an ordered, immutable [`Plan`] of UI-interaction steps:
//! - [`Resolver`] looks up entity types, actions and UI bindings
//! - [`Planner`] validates a request against that metadata and emits a plan
//! - [`Plan`] / [`PlanStep`] are the value objects handed to an executor
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uiplan_core::prelude::*;
//!
//! let resolver = InMemoryResolver::new();
//! resolver.register_entity_type(EntityType::new("Building", "Building"));
//! resolver.register_action(
//!     Action::new("order_egrn_extract", "Order EGRN extract").applicable_to("Building"),
//! );
//! resolver.register_ui_binding(UiBinding::new(
//!     "order_egrn_extract",
//!     "[data-action='order_egrn_extract']",
//!     SelectorKind::Css,
//! ));
//!
//! let planner = Planner::new(Arc::new(resolver));
//! let request = ExecutionRequest::new("Building", "93939", "order_egrn_extract").unwrap();
//! let plan = planner.create_plan(&request).unwrap();
//!
//! assert_eq!(plan.steps()[0].target(), Some("/buildings/93939"));
//! ```

#![warn(unreachable_pub)]

pub mod domain;
pub mod error;
pub mod plan;
pub mod planner;
pub mod resolver;
pub mod types;

pub use domain::{Action, EntityType, ExecutionRequest, SelectorKind, UiBinding};
pub use error::{CatalogError, ParseStepTypeError, PlanningError, RequestError};
pub use plan::{action_target, Plan, PlanStatus, PlanStep, StepType};
pub use planner::{entity_page_url, Planner, RESULT_TARGET, URL_TEMPLATE_KEY};
pub use resolver::{Catalog, CatalogResolver, InMemoryResolver, Resolver};
pub use types::{Metadata, PlanId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and inspecting plans
    pub use crate::{
        Action, EntityType, ExecutionRequest, InMemoryResolver, Plan, PlanStatus, PlanStep,
        Planner, PlanningError, Resolver, SelectorKind, StepType, UiBinding,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
