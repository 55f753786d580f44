//! Concurrent in-memory resolver

use super::Resolver;
use crate::domain::{Action, EntityType, UiBinding};
use dashmap::DashMap;

/// Mutable metadata registry backed by sharded concurrent maps
///
/// Lookups and registrations may run concurrently from any number of
/// threads. Entries are replaced whole, so a reader sees either the previous
/// or the new value of a key, and a completed registration is visible to
/// every lookup that starts after it.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    entity_types: DashMap<String, EntityType>,
    actions: DashMap<String, Action>,
    ui_bindings: DashMap<String, UiBinding>,
}

impl InMemoryResolver {
    /// Create empty resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an entity type, returning the previous value
    pub fn register_entity_type(&self, entity_type: EntityType) -> Option<EntityType> {
        tracing::debug!(entity_type = entity_type.id(), "registering entity type");
        self.entity_types
            .insert(entity_type.id().to_string(), entity_type)
    }

    /// Register (or replace) an action, returning the previous value
    pub fn register_action(&self, action: Action) -> Option<Action> {
        tracing::debug!(action = action.id(), "registering action");
        self.actions.insert(action.id().to_string(), action)
    }

    /// Register (or replace) the binding of an action, returning the previous value
    pub fn register_ui_binding(&self, binding: UiBinding) -> Option<UiBinding> {
        tracing::debug!(action = binding.action_id(), "registering ui binding");
        self.ui_bindings
            .insert(binding.action_id().to_string(), binding)
    }

    /// Number of registered entity types
    #[inline]
    #[must_use]
    pub fn entity_type_count(&self) -> usize {
        self.entity_types.len()
    }

    /// Number of registered actions
    #[inline]
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Number of registered UI bindings
    #[inline]
    #[must_use]
    pub fn ui_binding_count(&self) -> usize {
        self.ui_bindings.len()
    }
}

impl Resolver for InMemoryResolver {
    fn find_entity_type(&self, entity_type_id: &str) -> Option<EntityType> {
        self.entity_types
            .get(entity_type_id)
            .map(|entry| entry.value().clone())
    }

    fn find_action(&self, action_id: &str) -> Option<Action> {
        self.actions.get(action_id).map(|entry| entry.value().clone())
    }

    fn find_ui_binding(&self, action_id: &str) -> Option<UiBinding> {
        self.ui_bindings
            .get(action_id)
            .map(|entry| entry.value().clone())
    }
}
