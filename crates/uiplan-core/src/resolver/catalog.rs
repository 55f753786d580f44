//! File-backed catalog resolver
//!
//! Loads the metadata declared by an administrator in a TOML, JSON or YAML
//! document and serves it as an immutable snapshot:
//!
//! ```toml
//! [[entity_types]]
//! id = "Building"
//! display_name = "Building"
//!
//! [[actions]]
//! id = "order_egrn_extract"
//! display_name = "Order EGRN extract"
//! applicable_entity_types = ["Building"]
//!
//! [[ui_bindings]]
//! action_id = "order_egrn_extract"
//! selector = "[data-action='order_egrn_extract']"
//! selector_kind = "CSS"
//! ```

use super::Resolver;
use crate::domain::{Action, EntityType, UiBinding};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Catalog document layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Declared entity types
    #[serde(default)]
    pub entity_types: Vec<EntityType>,
    /// Declared actions
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Declared UI bindings (one per action)
    #[serde(default)]
    pub ui_bindings: Vec<UiBinding>,
}

/// Immutable resolver over a loaded [`Catalog`]
///
/// Never changes after construction, so concurrent lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    entity_types: HashMap<String, EntityType>,
    actions: HashMap<String, Action>,
    ui_bindings: HashMap<String, UiBinding>,
}

impl CatalogResolver {
    /// Index a catalog
    ///
    /// # Errors
    /// `CatalogError::Duplicate` if an id appears twice within a section
    pub fn from_catalog(catalog: Catalog) -> Result<Self, CatalogError> {
        let entity_types = index("entity_types", catalog.entity_types, |e| e.id())?;
        let actions = index("actions", catalog.actions, |a| a.id())?;
        let ui_bindings = index("ui_bindings", catalog.ui_bindings, |b| b.action_id())?;

        tracing::info!(
            entity_types = entity_types.len(),
            actions = actions.len(),
            ui_bindings = ui_bindings.len(),
            "catalog loaded"
        );

        Ok(Self {
            entity_types,
            actions,
            ui_bindings,
        })
    }

    /// Parse a TOML catalog
    ///
    /// # Errors
    /// Parse failures or duplicate ids
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        Self::from_catalog(toml::from_str(source)?)
    }

    /// Parse a JSON catalog
    ///
    /// # Errors
    /// Parse failures or duplicate ids
    pub fn from_json_str(source: &str) -> Result<Self, CatalogError> {
        Self::from_catalog(serde_json::from_str(source)?)
    }

    /// Parse a YAML catalog
    ///
    /// # Errors
    /// Parse failures or duplicate ids
    pub fn from_yaml_str(source: &str) -> Result<Self, CatalogError> {
        Self::from_catalog(serde_yaml::from_str(source)?)
    }

    /// Load a catalog file, choosing the format by extension
    /// (`toml`, `json`, `yaml`/`yml`)
    ///
    /// # Errors
    /// I/O failures, unknown extensions, parse failures or duplicate ids
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let read = || {
            std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        match extension.as_str() {
            "toml" => Self::from_toml_str(&read()?),
            "json" => Self::from_json_str(&read()?),
            "yaml" | "yml" => Self::from_yaml_str(&read()?),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Number of entity types
    #[inline]
    #[must_use]
    pub fn entity_type_count(&self) -> usize {
        self.entity_types.len()
    }

    /// Number of actions
    #[inline]
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Number of UI bindings
    #[inline]
    #[must_use]
    pub fn ui_binding_count(&self) -> usize {
        self.ui_bindings.len()
    }
}

fn index<T>(
    section: &'static str,
    items: Vec<T>,
    key: impl Fn(&T) -> &str,
) -> Result<HashMap<String, T>, CatalogError> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        let id = key(&item).to_string();
        if map.contains_key(&id) {
            return Err(CatalogError::Duplicate { section, id });
        }
        map.insert(id, item);
    }
    Ok(map)
}

impl Resolver for CatalogResolver {
    fn find_entity_type(&self, entity_type_id: &str) -> Option<EntityType> {
        self.entity_types.get(entity_type_id).cloned()
    }

    fn find_action(&self, action_id: &str) -> Option<Action> {
        self.actions.get(action_id).cloned()
    }

    fn find_ui_binding(&self, action_id: &str) -> Option<UiBinding> {
        self.ui_bindings.get(action_id).cloned()
    }
}
