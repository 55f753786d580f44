//! Metadata resolution
//!
//! The [`Resolver`] trait is the only way the planner (and the agent layer)
//! reach entity types, actions and UI bindings. Two backends are provided:
//! - [`InMemoryResolver`]: concurrent, mutable registry
//! - [`CatalogResolver`]: immutable snapshot loaded from a catalog file

mod catalog;
mod in_memory;

pub use catalog::{Catalog, CatalogResolver};
pub use in_memory::InMemoryResolver;

use crate::domain::{Action, EntityType, UiBinding};

/// Read-only metadata lookup
///
/// Implementations must be safe for concurrent reads and have no side effects.
pub trait Resolver: Send + Sync {
    /// Find entity type by id
    fn find_entity_type(&self, entity_type_id: &str) -> Option<EntityType>;

    /// Find action by id
    fn find_action(&self, action_id: &str) -> Option<Action>;

    /// Find the UI binding of an action
    fn find_ui_binding(&self, action_id: &str) -> Option<UiBinding>;

    /// Check whether a known action applies to an entity type
    ///
    /// Unknown actions are never applicable.
    fn is_action_applicable(&self, action_id: &str, entity_type_id: &str) -> bool {
        self.find_action(action_id)
            .is_some_and(|action| action.is_applicable_to(entity_type_id))
    }
}
