//! Error types for uiplan Core
//!
//! Provides error handling for:
//! - Malformed execution requests
//! - Planning validation failures
//! - Metadata catalog loading

use std::path::PathBuf;

/// Request construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Required identifier is missing or blank
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Planning validation errors
///
/// Raised by [`crate::Planner::create_plan`] in check order; the first failing
/// check wins and no plan is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    /// Entity type is not known to the resolver
    #[error("entity type not found: {0}")]
    UnknownEntityType(String),

    /// Action is not known to the resolver
    #[error("action not found: {0}")]
    UnknownAction(String),

    /// Action exists but does not apply to the entity type
    #[error("action '{action_id}' is not applicable to entity type '{entity_type_id}'")]
    ActionNotApplicable {
        /// Requested action
        action_id: String,
        /// Requested entity type
        entity_type_id: String,
    },

    /// Action has no UI binding
    #[error("ui binding not found for action: {0}")]
    MissingUiBinding(String),
}

impl PlanningError {
    /// Identifier the caller has to fix
    #[must_use]
    pub fn offending_id(&self) -> &str {
        match self {
            Self::UnknownEntityType(id) | Self::UnknownAction(id) | Self::MissingUiBinding(id) => id,
            Self::ActionNotApplicable { action_id, .. } => action_id,
        }
    }
}

/// Metadata catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML parse failure
    #[error("invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse failure
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse failure
    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is not toml, json, yaml or yml
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    /// Same id declared twice within one catalog section
    #[error("duplicate {section} id in catalog: {id}")]
    Duplicate {
        /// Catalog section (entity_types, actions, ui_bindings)
        section: &'static str,
        /// Repeated id
        id: String,
    },
}

/// Unknown step type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown step type: {0}")]
pub struct ParseStepTypeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planning_error_display() {
        let err = PlanningError::ActionNotApplicable {
            action_id: "close_contract".to_string(),
            entity_type_id: "Building".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "action 'close_contract' is not applicable to entity type 'Building'"
        );
    }

    #[test]
    fn planning_error_offending_id() {
        assert_eq!(
            PlanningError::UnknownEntityType("Ship".to_string()).offending_id(),
            "Ship"
        );
        assert_eq!(
            PlanningError::MissingUiBinding("archive".to_string()).offending_id(),
            "archive"
        );
    }

    #[test]
    fn catalog_duplicate_display() {
        let err = CatalogError::Duplicate {
            section: "actions",
            id: "archive".to_string(),
        };
        assert!(err.to_string().contains("duplicate actions id"));
    }
}
