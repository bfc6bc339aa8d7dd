//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the translation engine
    #[error("Engine error: {0}")]
    Engine(#[from] graphbridge_core::Error),

    /// Payload failed schema validation
    #[error("Validation failed: {0}")]
    Validation(#[from] graphbridge_schemas::ValidationErrors),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {} format", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// No bridge registered under the requested id
    #[error("Bridge '{}' is not registered", id)]
    UnknownBridge { id: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Engine(e) => engine_exit_code(e),
            Self::Validation(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::InvalidFormat { .. } => 5,
            Self::Config(_) => 6,
            Self::InvalidArgs(_) => 7,
            Self::UnknownBridge { .. } => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Exit codes for engine errors, one per failure kind
fn engine_exit_code(error: &graphbridge_core::Error) -> i32 {
    use graphbridge_core::Error as Core;

    match error {
        Core::Schema { .. } => 20,
        Core::DuplicateModel { .. } => 21,
        Core::ModelNotFound { .. } => 22,
        Core::BridgeValidation { .. } => 23,
        Core::BridgeNotFound { .. } => 24,
        Core::Mapping { .. } => 25,
        Core::TranslationFailed { .. } => 26,
        Core::ComponentValidation { .. } => 27,
        Core::PipelineExecution { .. } => 28,
        Core::StageTimeout { .. } => 29,
        Core::Cancelled { .. } => 30,
        Core::Internal { .. } => 31,
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_engine_error() {
        let route_missing = Error::Engine(graphbridge_core::Error::BridgeNotFound {
            source: "a".to_string(),
            target: "b".to_string(),
        });
        let model_missing = Error::Engine(graphbridge_core::Error::ModelNotFound {
            name: "m".to_string(),
        });

        assert_eq!(route_missing.exit_code(), 24);
        assert_eq!(model_missing.exit_code(), 22);
        assert_ne!(route_missing.exit_code(), model_missing.exit_code());
    }

    #[test]
    fn test_only_invalid_args_shows_help() {
        assert!(Error::invalid_args("missing --mappings").should_show_help());
        assert!(!Error::other("boom").should_show_help());
    }

    #[test]
    fn test_format_error_without_color() {
        let error = Error::UnknownBridge {
            id: "b9".to_string(),
        };
        assert_eq!(
            format_error(&error, false),
            "Error: Bridge 'b9' is not registered"
        );
    }
}
