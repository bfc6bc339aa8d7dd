//! Payload validation against entity schemas
//!
//! An [`EntitySchema`] compiles down to a plain JSON Schema document, and
//! payloads are checked against it with the `jsonschema` crate. The
//! [`SchemaValidator`] trait is the seam for swapping in other engines.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use crate::schema::{EntitySchema, GraphSchema};
use crate::validation::error::{ValidationError, ValidationResult, Violation};
use serde_json::{json, Value};

/// Validates a payload claimed to be an instance of one entity
pub trait SchemaValidator {
    /// Validate `data` against the named entity of `schema`
    fn validate(&self, schema: &GraphSchema, entity: &str, data: &Value) -> ValidationResult<()>;
}

/// JSON Schema backed payload validator
///
/// Unknown fields are accepted; only declared types and the `required`
/// list are enforced.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Compile one entity schema into a JSON Schema document
    fn entity_document(entity: &EntitySchema) -> Value {
        let mut properties = serde_json::Map::new();
        for (name, spec) in &entity.fields {
            let property = match spec.field_type.json_type() {
                Some(ty) => json!({"type": ty}),
                None => json!({}),
            };
            properties.insert(name.clone(), property);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": entity.required,
        })
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, schema: &GraphSchema, entity: &str, data: &Value) -> ValidationResult<()> {
        let Some(entity_schema) = schema.entity(entity) else {
            return Err(ValidationError::new(
                "$",
                format!("Unknown entity '{}'", entity),
            ));
        };

        let document = Self::entity_document(entity_schema);
        let validator = jsonschema::validator_for(&document).map_err(|e| {
            ValidationError::new(
                "$",
                format!("Entity '{}' does not compile to a JSON Schema: {}", entity, e),
            )
        })?;

        let violations: Vec<Violation> = validator
            .iter_errors(data)
            .map(|e| {
                ValidationError::create_violation(
                    "json_schema",
                    format!(
                        "value at '{}' to satisfy the '{}' entity schema",
                        e.instance_path, entity
                    ),
                    e.to_string(),
                )
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::with_violations(
                "$",
                format!("Payload does not conform to entity '{}'", entity),
                violations,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_schema() -> GraphSchema {
        serde_json::from_value(json!({
            "entities": {
                "asset": {
                    "fields": {
                        "url": {"type": "string"},
                        "size": {"type": "integer"},
                        "extra": {"type": "any"}
                    },
                    "required": ["url"]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_conforming_payload_passes() {
        let schema = create_test_schema();
        let data = json!({"url": "https://example.com/a.png", "size": 42});
        assert!(JsonSchemaValidator::new()
            .validate(&schema, "asset", &data)
            .is_ok());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let schema = create_test_schema();
        let data = json!({"size": 42});
        let err = JsonSchemaValidator::new()
            .validate(&schema, "asset", &data)
            .unwrap_err();
        assert!(!err.violations.is_empty());
        assert_eq!(err.violations[0].rule, "json_schema");
    }

    #[test]
    fn test_wrong_type_fails() {
        let schema = create_test_schema();
        let data = json!({"url": "x", "size": "not-a-number"});
        assert!(JsonSchemaValidator::new()
            .validate(&schema, "asset", &data)
            .is_err());
    }

    #[test]
    fn test_any_field_accepts_everything() {
        let schema = create_test_schema();
        for extra in [json!(1), json!("s"), json!({"k": true}), json!([1, 2])] {
            let data = json!({"url": "x", "extra": extra});
            assert!(JsonSchemaValidator::new()
                .validate(&schema, "asset", &data)
                .is_ok());
        }
    }

    #[test]
    fn test_undeclared_fields_are_accepted() {
        let schema = create_test_schema();
        let data = json!({"url": "x", "surplus": "tolerated"});
        assert!(JsonSchemaValidator::new()
            .validate(&schema, "asset", &data)
            .is_ok());
    }

    #[test]
    fn test_unknown_entity_is_an_error() {
        let schema = create_test_schema();
        let err = JsonSchemaValidator::new()
            .validate(&schema, "ghost", &json!({}))
            .unwrap_err();
        assert!(err.message.contains("Unknown entity"));
    }
}
