//! Structural validator for graph schemas
//!
//! Checks the internal consistency of a [`GraphSchema`]: relationships may
//! only reference declared entities, and constraint paths may only reference
//! declared fields. All violations are collected before returning.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use crate::schema::GraphSchema;
use crate::validation::context::ValidationContext;
use crate::validation::error::{ValidationError, ValidationErrors};

/// Validator for the structural invariants of a graph schema
#[derive(Debug, Clone, Default)]
pub struct GraphSchemaValidator;

impl GraphSchemaValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a schema, collecting every violation found
    pub fn validate(&self, schema: &GraphSchema) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let context = ValidationContext::new();

        self.validate_relationships(schema, &context.child("relationships"), &mut errors);
        self.validate_constraints(schema, &context.child("constraints"), &mut errors);

        errors.into_result()
    }

    fn validate_relationships(
        &self,
        schema: &GraphSchema,
        context: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        for (name, relationship) in &schema.relationships {
            let rel_context = context.child(name);

            for (endpoint, entity) in [("from", &relationship.from), ("to", &relationship.to)] {
                if !schema.entities.contains_key(entity) {
                    errors.add(ValidationError::with_violations(
                        &rel_context.child(endpoint).path,
                        format!(
                            "Relationship '{}' references undeclared entity '{}'",
                            name, entity
                        ),
                        vec![ValidationError::create_violation(
                            "entity_reference",
                            "a declared entity name",
                            format!("'{}'", entity),
                        )],
                    ));
                }
            }
        }
    }

    fn validate_constraints(
        &self,
        schema: &GraphSchema,
        context: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        for (name, paths) in &schema.constraints {
            let constraint_context = context.child(name);

            for (i, path) in paths.iter().enumerate() {
                let path_context = constraint_context.child_index(i);

                let Some((owner, field_path)) = path.split_once('.') else {
                    errors.add(ValidationError::with_violations(
                        &path_context.path,
                        format!("Constraint '{}' has malformed path '{}'", name, path),
                        vec![ValidationError::create_violation(
                            "constraint_path",
                            "a path of the form '<owner>.<field>'",
                            format!("'{}'", path),
                        )],
                    ));
                    continue;
                };

                // Only the root field needs to be declared; deeper
                // segments address into its value.
                let field_root = field_path.split('.').next().unwrap_or(field_path);
                if !schema.declares_field(owner, field_root) {
                    errors.add(ValidationError::with_violations(
                        &path_context.path,
                        format!(
                            "Constraint '{}' references undeclared field '{}.{}'",
                            name, owner, field_root
                        ),
                        vec![ValidationError::create_violation(
                            "constraint_reference",
                            format!("a field declared on '{}'", owner),
                            format!("'{}'", field_root),
                        )],
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_schema(value: serde_json::Value) -> GraphSchema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_schema_passes() {
        let schema = create_test_schema(json!({
            "entities": {
                "asset": {
                    "fields": {"url": {"type": "string"}},
                    "required": ["url"]
                },
                "content": {
                    "fields": {"body": {"type": "string"}}
                }
            },
            "relationships": {
                "derived_from": {"from": "asset", "to": "content"}
            },
            "constraints": {
                "asset_url_present": ["asset.url"]
            }
        }));

        assert!(GraphSchemaValidator::new().validate(&schema).is_ok());
    }

    #[test]
    fn test_relationship_to_unknown_entity_fails() {
        let schema = create_test_schema(json!({
            "entities": {
                "asset": {"fields": {"url": {"type": "string"}}}
            },
            "relationships": {
                "derived_from": {"from": "asset", "to": "ghost"}
            }
        }));

        let errors = GraphSchemaValidator::new().validate(&schema).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].path, "$.relationships.derived_from.to");
        assert_eq!(errors.errors[0].violations[0].rule, "entity_reference");
    }

    #[test]
    fn test_constraint_on_undeclared_field_fails() {
        let schema = create_test_schema(json!({
            "entities": {
                "asset": {"fields": {"url": {"type": "string"}}}
            },
            "constraints": {
                "bad": ["asset.missing"]
            }
        }));

        let errors = GraphSchemaValidator::new().validate(&schema).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].violations[0].rule, "constraint_reference");
    }

    #[test]
    fn test_constraint_on_relationship_field_passes() {
        let schema = create_test_schema(json!({
            "entities": {
                "asset": {"fields": {"url": {"type": "string"}}},
                "content": {"fields": {"body": {"type": "string"}}}
            },
            "relationships": {
                "derived_from": {
                    "from": "asset",
                    "to": "content",
                    "fields": {"weight": {"type": "number"}}
                }
            },
            "constraints": {
                "weighted": ["derived_from.weight"]
            }
        }));

        assert!(GraphSchemaValidator::new().validate(&schema).is_ok());
    }

    #[test]
    fn test_nested_constraint_path_checks_root_field() {
        let schema = create_test_schema(json!({
            "entities": {
                "asset": {"fields": {"meta": {"type": "object"}}}
            },
            "constraints": {
                "deep": ["asset.meta.mime"]
            }
        }));

        assert!(GraphSchemaValidator::new().validate(&schema).is_ok());
    }

    #[test]
    fn test_malformed_constraint_path_fails() {
        let schema = create_test_schema(json!({
            "entities": {
                "asset": {"fields": {"url": {"type": "string"}}}
            },
            "constraints": {
                "bad": ["asset"]
            }
        }));

        let errors = GraphSchemaValidator::new().validate(&schema).unwrap_err();
        assert_eq!(errors.errors[0].violations[0].rule, "constraint_path");
    }

    #[test]
    fn test_all_violations_collected() {
        let schema = create_test_schema(json!({
            "entities": {
                "asset": {"fields": {"url": {"type": "string"}}}
            },
            "relationships": {
                "a": {"from": "ghost", "to": "phantom"}
            },
            "constraints": {
                "bad": ["asset.missing", "nope"]
            }
        }));

        let errors = GraphSchemaValidator::new().validate(&schema).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
