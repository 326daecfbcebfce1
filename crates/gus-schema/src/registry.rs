//! Schema Registry
//!
//! Read-only mapping from logical entity/field aliases to concrete schema
//! names, loaded once and injected into query builders by reference.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Registry loading errors
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed schema resource: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One catalogued entity: its concrete object name plus field aliases
///
/// The JSON resource shape is `{"Object": "<concrete>", "<alias>":
/// "<concrete field>", ...}`, one entry per logical entity.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaEntry {
    /// Concrete object name in the target schema
    #[serde(rename = "Object")]
    pub object: String,

    /// Field alias -> concrete field name
    #[serde(flatten)]
    pub fields: HashMap<String, String>,
}

impl SchemaEntry {
    /// Create an entry with no field aliases.
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field alias (builder pattern).
    pub fn with_field(mut self, alias: impl Into<String>, concrete: impl Into<String>) -> Self {
        self.fields.insert(alias.into(), concrete.into());
        self
    }
}

static BUILTIN: Lazy<SchemaRegistry> = Lazy::new(|| {
    SchemaRegistry::from_json(include_str!("../resources/objects.json"))
        .expect("built-in objects.json is well-formed")
});

/// Immutable logical-name catalogue
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<String, SchemaEntry>,
}

impl SchemaRegistry {
    /// Parse a registry from a JSON resource.
    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let entries: HashMap<String, SchemaEntry> = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }

    /// Build a registry from in-memory entries (synthetic schemas in tests).
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, SchemaEntry)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The compiled-in catalogue, parsed once per process.
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    /// Look up the full entry for a logical name, if catalogued.
    pub fn entry(&self, alias: &str) -> Option<&SchemaEntry> {
        self.entries.get(alias)
    }

    /// Concrete object name for a logical name.
    ///
    /// An uncatalogued name is used as-is so objects outside the catalogue
    /// remain queryable; the fallback is reported at warn level.
    pub fn resolve_object(&self, alias: &str) -> String {
        match self.entries.get(alias) {
            Some(entry) => entry.object.clone(),
            None => {
                warn!(alias, "object not found in the schema catalogue, using the name as-is");
                alias.to_string()
            }
        }
    }

    /// Concrete field name for a per-entity field alias.
    ///
    /// Falls back to the alias itself when either the entity or the alias
    /// is uncatalogued; field names are routinely passed through literally,
    /// so the fallback is only a debug-level event.
    pub fn resolve_field(&self, alias: &str, field: &str) -> String {
        match self.entries.get(alias).and_then(|e| e.fields.get(field)) {
            Some(concrete) => concrete.clone(),
            None => {
                debug!(alias, field, "field alias not catalogued, using the name as-is");
                field.to_string()
            }
        }
    }

    /// Number of catalogued entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic() -> SchemaRegistry {
        SchemaRegistry::from_entries([(
            "Widget".to_string(),
            SchemaEntry::new("Widget__c").with_field("Owner", "Owner_Lookup__c"),
        )])
    }

    #[test]
    fn test_resolve_known_object() {
        let registry = synthetic();
        assert_eq!(registry.resolve_object("Widget"), "Widget__c");
    }

    #[test]
    fn test_resolve_unknown_object_falls_back() {
        let registry = synthetic();
        assert_eq!(registry.resolve_object("Gadget__c"), "Gadget__c");
    }

    #[test]
    fn test_resolve_field_alias() {
        let registry = synthetic();
        assert_eq!(registry.resolve_field("Widget", "Owner"), "Owner_Lookup__c");
        assert_eq!(registry.resolve_field("Widget", "Id"), "Id");
        assert_eq!(registry.resolve_field("Gadget", "Owner"), "Owner");
    }

    #[test]
    fn test_from_json() {
        let registry = SchemaRegistry::from_json(
            r#"{"Case": {"Object": "Case", "Team": "Team_Lookup__c"}}"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve_field("Case", "Team"), "Team_Lookup__c");
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(SchemaRegistry::from_json("not json").is_err());
    }

    #[test]
    fn test_builtin_catalogue() {
        let registry = SchemaRegistry::builtin();
        assert!(!registry.is_empty());
        assert_eq!(registry.resolve_object("Case"), "Case");
        assert_eq!(registry.resolve_object("Release"), "ADM_Release__c");
        assert_eq!(registry.resolve_field("Case", "Team"), "Team_Lookup__c");
        assert_eq!(registry.resolve_field("ReleaseEvent", "Case"), "ChangeCase__c");
        assert!(registry.entry("ScrumMember").is_some());
    }
}
