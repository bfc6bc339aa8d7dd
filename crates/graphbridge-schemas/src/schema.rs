//! Typed graph-schema model
//!
//! A [`GraphSchema`] describes one business-data shape: its entities, the
//! relationships between them, and named constraints over declared fields.
//! All maps are `BTreeMap` so iteration and serialization order are
//! deterministic.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value types a field declaration can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    /// Accepts any JSON value; no type check is emitted for it
    Any,
}

impl FieldType {
    /// The JSON Schema `type` keyword this maps to, if any
    pub fn json_type(&self) -> Option<&'static str> {
        match self {
            FieldType::String => Some("string"),
            FieldType::Number => Some("number"),
            FieldType::Integer => Some("integer"),
            FieldType::Boolean => Some("boolean"),
            FieldType::Object => Some("object"),
            FieldType::Array => Some("array"),
            FieldType::Any => None,
        }
    }
}

/// A single field declaration on an entity or relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            description: None,
        }
    }
}

/// One entity shape: named fields plus the subset that is required
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One relationship shape between two declared entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSchema {
    /// Entity name the relationship starts from
    pub from: String,
    /// Entity name the relationship points to
    pub to: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldSpec>,
}

/// A complete graph-shaped data-model schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSchema {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub entities: BTreeMap<String, EntitySchema>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, RelationshipSchema>,
    /// Constraint name to the `<owner>.<field>` paths it covers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constraints: BTreeMap<String, Vec<String>>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for GraphSchema {
    fn default() -> Self {
        Self {
            version: default_version(),
            entities: BTreeMap::new(),
            relationships: BTreeMap::new(),
            constraints: BTreeMap::new(),
        }
    }
}

impl GraphSchema {
    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.get(name)
    }

    /// Look up a relationship by name
    pub fn relationship(&self, name: &str) -> Option<&RelationshipSchema> {
        self.relationships.get(name)
    }

    /// Whether `owner` (entity or relationship) declares a field named `field`
    pub fn declares_field(&self, owner: &str, field: &str) -> bool {
        if let Some(entity) = self.entities.get(owner) {
            return entity.fields.contains_key(field);
        }
        if let Some(relationship) = self.relationships.get(owner) {
            return relationship.fields.contains_key(field);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_schema() -> GraphSchema {
        serde_json::from_value(json!({
            "version": "1.0",
            "entities": {
                "asset": {
                    "fields": {
                        "url": {"type": "string"},
                        "size": {"type": "integer"}
                    },
                    "required": ["url"]
                },
                "content": {
                    "fields": {
                        "body": {"type": "string"}
                    }
                }
            },
            "relationships": {
                "derived_from": {
                    "from": "asset",
                    "to": "content",
                    "fields": {"weight": {"type": "number"}}
                }
            },
            "constraints": {
                "asset_url_present": ["asset.url"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_schema() {
        let schema = create_test_schema();
        assert_eq!(schema.version, "1.0");
        assert_eq!(schema.entities.len(), 2);
        assert_eq!(schema.relationships.len(), 1);
        assert_eq!(schema.constraints["asset_url_present"], vec!["asset.url"]);
    }

    #[test]
    fn test_version_defaults_when_missing() {
        let schema: GraphSchema = serde_json::from_value(json!({
            "entities": {}
        }))
        .unwrap();
        assert_eq!(schema.version, "1.0");
    }

    #[test]
    fn test_declares_field() {
        let schema = create_test_schema();
        assert!(schema.declares_field("asset", "url"));
        assert!(schema.declares_field("derived_from", "weight"));
        assert!(!schema.declares_field("asset", "missing"));
        assert!(!schema.declares_field("nobody", "url"));
    }

    #[test]
    fn test_field_type_wire_form_is_lowercase() {
        let spec: FieldSpec = serde_json::from_value(json!({"type": "boolean"})).unwrap();
        assert_eq!(spec.field_type, FieldType::Boolean);
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"type": "boolean"})
        );
    }

    #[test]
    fn test_json_type_mapping() {
        assert_eq!(FieldType::Integer.json_type(), Some("integer"));
        assert_eq!(FieldType::Any.json_type(), None);
    }
}
