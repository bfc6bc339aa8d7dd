//! Graphbridge Schemas - graph-schema data model and validators
//!
//! This crate defines the typed schema model that Graphbridge data models
//! carry (entities, relationships, constraints) and the validators that run
//! against it:
//!
//! - **Structural validation**: referential-integrity checks over a
//!   [`schema::GraphSchema`] itself (relationships must reference declared
//!   entities, constraints must reference declared fields).
//! - **Payload validation**: the pluggable [`validation::SchemaValidator`]
//!   capability, with a JSON Schema backed implementation for checking data
//!   records against one entity's declared shape.
//!
//! ## Quick Start
//!
//! ```rust
//! use graphbridge_schemas::{GraphSchema, GraphSchemaValidator};
//!
//! let schema: GraphSchema = serde_json::from_value(serde_json::json!({
//!     "version": "1.0",
//!     "entities": {
//!         "asset": {"fields": {"url": {"type": "string"}}, "required": ["url"]}
//!     }
//! })).unwrap();
//!
//! let validator = GraphSchemaValidator::new();
//! assert!(validator.validate(&schema).is_ok());
//! ```
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

pub mod schema;
pub mod validation;

// Re-export commonly used types for convenience
pub use schema::{EntitySchema, FieldSpec, FieldType, GraphSchema, RelationshipSchema};
pub use validation::{
    GraphSchemaValidator, JsonSchemaValidator, SchemaValidator, ValidationContext,
    ValidationError, ValidationErrors, ValidationResult, Violation,
};
