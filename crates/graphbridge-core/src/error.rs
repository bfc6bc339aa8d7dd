//! Error types for the Graphbridge core library
//!
//! This module defines the error handling system for Graphbridge, using
//! thiserror for ergonomic error definitions and anyhow for flexible error
//! contexts.

use graphbridge_schemas::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for Graphbridge operations
#[derive(Error, Debug)]
pub enum Error {
    /// A model's graph schema failed structural validation
    #[error("Schema validation failed for model '{model}'")]
    Schema {
        model: String,
        #[source]
        source: ValidationErrors,
    },

    /// A model with this name is already registered
    #[error("Model '{name}' is already registered")]
    DuplicateModel { name: String },

    /// No model registered under this name
    #[error("Model '{name}' is not registered")]
    ModelNotFound { name: String },

    /// A bridge definition failed its structural checks
    #[error("Bridge '{bridge_id}' is invalid: {reason}")]
    BridgeValidation { bridge_id: String, reason: String },

    /// No bridge connects the requested model pair in this direction
    #[error("No bridge registered from '{source}' to '{target}'")]
    BridgeNotFound { r#source: String, target: String },

    /// A single field rule could not be applied
    #[error("Mapping error for field '{field}': {message}")]
    Mapping { field: String, message: String },

    /// Every record in a batch failed translation
    #[error("Translation through bridge '{bridge_id}' failed: all {processed} records failed")]
    TranslationFailed {
        bridge_id: String,
        processed: usize,
        errors: Vec<RecordError>,
    },

    /// A pipeline component rejected its execution context
    #[error("Component '{component_id}' rejected its execution context")]
    ComponentValidation { component_id: String },

    /// A pipeline stage failed; the source is the stage's own error
    #[error("Pipeline stage '{component_id}' failed")]
    PipelineExecution {
        component_id: String,
        #[source]
        source: Box<Error>,
    },

    /// A pipeline stage exceeded the configured timeout
    #[error("Component '{component_id}' exceeded the stage timeout of {timeout_ms}ms")]
    StageTimeout {
        component_id: String,
        timeout_ms: u64,
    },

    /// Pipeline execution was cancelled between stages
    #[error("Pipeline '{pipeline_id}' was cancelled")]
    Cancelled { pipeline_id: String },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// One failed record inside a batch translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordError {
    /// Position of the record in the input batch
    pub index: usize,
    /// Target field being produced when the failure occurred, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// What went wrong
    pub message: String,
}

impl RecordError {
    /// Record-level failure not tied to a single field
    pub fn record<M: Into<String>>(index: usize, message: M) -> Self {
        Self {
            index,
            field: None,
            message: message.into(),
        }
    }

    /// Failure while producing one target field
    pub fn field<F: Into<String>, M: Into<String>>(index: usize, field: F, message: M) -> Self {
        Self {
            index,
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "record {}: field '{}': {}", self.index, field, self.message),
            None => write!(f, "record {}: {}", self.index, self.message),
        }
    }
}

// Conversion implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::BridgeNotFound {
            source: "content".to_string(),
            target: "asset".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No bridge registered from 'content' to 'asset'"
        );
    }

    #[test]
    fn test_record_error_display() {
        let with_field = RecordError::field(3, "url", "transform 'nope' is not registered");
        assert_eq!(
            with_field.to_string(),
            "record 3: field 'url': transform 'nope' is not registered"
        );

        let without_field = RecordError::record(0, "record is not an object");
        assert_eq!(without_field.to_string(), "record 0: record is not an object");
    }

    #[test]
    fn test_record_error_serialization_omits_absent_field() {
        let err = RecordError::record(1, "boom");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, serde_json::json!({"index": 1, "message": "boom"}));
    }

    #[test]
    fn test_pipeline_execution_wraps_source() {
        let inner = Error::ComponentValidation {
            component_id: "stage-2".to_string(),
        };
        let outer = Error::PipelineExecution {
            component_id: "stage-2".to_string(),
            source: Box::new(inner),
        };
        assert_eq!(outer.to_string(), "Pipeline stage 'stage-2' failed");
        assert!(std::error::Error::source(&outer).is_some());
    }

    #[test]
    fn test_from_anyhow() {
        let err: Error = anyhow::anyhow!("unexpected state").into();
        assert!(matches!(err, Error::Internal { .. }));
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }
}
