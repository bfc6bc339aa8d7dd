//! Validation module for graph schemas and entity payloads
//!
//! Two layers of checking live here:
//!
//! - **Structural**: [`GraphSchemaValidator`] verifies a schema is internally
//!   consistent (relationship and constraint references resolve).
//! - **Payload**: [`JsonSchemaValidator`] checks data claimed to be an
//!   instance of one entity, behind the [`SchemaValidator`] trait.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod data;
pub mod error;
pub mod graph;

// Re-export commonly used types
pub use context::ValidationContext;
pub use data::{JsonSchemaValidator, SchemaValidator};
pub use error::{ValidationError, ValidationErrors, ValidationResult, Violation};
pub use graph::GraphSchemaValidator;
