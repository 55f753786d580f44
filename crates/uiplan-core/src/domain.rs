//! Domain metadata and request types
//!
//! The platform knows nothing about the business domain: entity types,
//! actions and their UI bindings are plain metadata written by an external
//! administrative process and only read here.

use crate::error::RequestError;
use crate::types::Metadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Category of business object (e.g. "Building", "Contract")
///
/// Identity is the `id`; two entity types with the same id are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityType {
    id: String,
    display_name: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl EntityType {
    /// Create new entity type
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            metadata: Metadata::new(),
        }
    }

    /// With metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Entity type id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Metadata map
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// String metadata value, if present and a string
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(serde_json::Value::as_str)
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Atomic operation a user can trigger against entities of certain types
/// (e.g. "order_egrn_extract", "close_contract")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    id: String,
    display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, rename = "applicable_entity_types")]
    applicable_entity_type_ids: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Action {
    /// Create new action applicable to no entity type
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
            applicable_entity_type_ids: BTreeSet::new(),
            metadata: Metadata::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Make applicable to an entity type
    #[inline]
    #[must_use]
    pub fn applicable_to(mut self, entity_type_id: impl Into<String>) -> Self {
        self.applicable_entity_type_ids.insert(entity_type_id.into());
        self
    }

    /// With metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Action id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Optional long description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Entity types this action applies to
    #[inline]
    #[must_use]
    pub fn applicable_entity_type_ids(&self) -> &BTreeSet<String> {
        &self.applicable_entity_type_ids
    }

    /// Metadata map
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Check whether the action applies to an entity type
    #[inline]
    #[must_use]
    pub fn is_applicable_to(&self, entity_type_id: &str) -> bool {
        self.applicable_entity_type_ids.contains(entity_type_id)
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// How a UI binding's selector is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorKind {
    /// CSS selector
    #[serde(rename = "CSS")]
    Css,
    /// XPath expression
    #[serde(rename = "XPATH")]
    XPath,
    /// Visible text match
    #[serde(rename = "TEXT")]
    Text,
    /// Semantic action id understood by the agent
    #[serde(rename = "ACTION_ID")]
    ActionId,
}

/// Mapping from an action to the concrete UI locator that triggers it
///
/// One binding per action; identity is the `action_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiBinding {
    action_id: String,
    selector: String,
    selector_kind: SelectorKind,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl UiBinding {
    /// Create new binding
    #[inline]
    #[must_use]
    pub fn new(
        action_id: impl Into<String>,
        selector: impl Into<String>,
        selector_kind: SelectorKind,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            selector: selector.into(),
            selector_kind,
            metadata: Metadata::new(),
        }
    }

    /// With metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Bound action id
    #[inline]
    #[must_use]
    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    /// Concrete selector
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Selector interpretation
    #[inline]
    #[must_use]
    pub fn selector_kind(&self) -> SelectorKind {
        self.selector_kind
    }

    /// Metadata map
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl PartialEq for UiBinding {
    fn eq(&self, other: &Self) -> bool {
        self.action_id == other.action_id
    }
}

impl Eq for UiBinding {}

impl Hash for UiBinding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.action_id.hash(state);
    }
}

/// Caller request: perform `action_id` on entity `entity_id` of type `entity_type_id`
///
/// All identifiers are required and non-blank; construction (including
/// deserialization) fails otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExecutionRequest")]
pub struct ExecutionRequest {
    entity_type_id: String,
    entity_id: String,
    action_id: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    parameters: Metadata,
}

impl ExecutionRequest {
    /// Create new request
    ///
    /// # Errors
    /// `RequestError::MissingField` if any identifier is empty or blank
    pub fn new(
        entity_type_id: impl Into<String>,
        entity_id: impl Into<String>,
        action_id: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let entity_type_id = required("entity_type_id", entity_type_id.into())?;
        let entity_id = required("entity_id", entity_id.into())?;
        let action_id = required("action_id", action_id.into())?;

        Ok(Self {
            entity_type_id,
            entity_id,
            action_id,
            parameters: Metadata::new(),
        })
    }

    /// With request parameter
    #[inline]
    #[must_use]
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// With full parameter map
    #[inline]
    #[must_use]
    pub fn with_parameters(mut self, parameters: Metadata) -> Self {
        self.parameters = parameters;
        self
    }

    /// Requested entity type
    #[inline]
    #[must_use]
    pub fn entity_type_id(&self) -> &str {
        &self.entity_type_id
    }

    /// Requested entity instance
    #[inline]
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Requested action
    #[inline]
    #[must_use]
    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    /// Free-form parameters
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &Metadata {
        &self.parameters
    }
}

fn required(field: &'static str, value: String) -> Result<String, RequestError> {
    if value.is_empty() {
        Err(RequestError::MissingField(field))
    } else {
        Ok(value)
    }
}

#[derive(Deserialize)]
struct RawExecutionRequest {
    #[serde(default)]
    entity_type_id: String,
    #[serde(default)]
    entity_id: String,
    #[serde(default)]
    action_id: String,
    #[serde(default)]
    parameters: Metadata,
}

impl TryFrom<RawExecutionRequest> for ExecutionRequest {
    type Error = RequestError;

    fn try_from(raw: RawExecutionRequest) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.entity_type_id, raw.entity_id, raw.action_id)?
            .with_parameters(raw.parameters))
    }
}
