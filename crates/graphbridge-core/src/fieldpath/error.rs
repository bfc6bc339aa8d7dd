//! Error types for field path operations
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while parsing or applying a field path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldPathError {
    /// Parse errors with byte position into the original input
    #[error("Parse error at position {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// A path step landed on a value of the wrong container type
    #[error("Type mismatch: expected {expected}, found {found} at {path}")]
    TypeMismatch {
        expected: String,
        found: String,
        path: String,
    },
}

impl FieldPathError {
    /// Create a parse error with position information
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            path: path.into(),
        }
    }

    /// Get the error message with the offending input and a caret marker
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Parse {
                message,
                position,
                input,
            } => {
                let mut result = format!("Parse error at position {}: {}", position, message);
                if !input.is_empty() {
                    result.push_str(&format!("\nInput: {}", input));
                    if *position <= input.len() {
                        result.push_str(&format!("\n       {}^", " ".repeat(*position)));
                    }
                }
                result
            }
            _ => self.to_string(),
        }
    }
}

// Convert FieldPathError to the main Error type
impl From<FieldPathError> for crate::Error {
    fn from(err: FieldPathError) -> Self {
        let field = match &err {
            FieldPathError::Parse { input, .. } => input.clone(),
            FieldPathError::TypeMismatch { path, .. } => path.clone(),
        };
        crate::Error::Mapping {
            field,
            message: err.to_string(),
        }
    }
}
