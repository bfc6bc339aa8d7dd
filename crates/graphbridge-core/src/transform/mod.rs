//! Named transform registry
//!
//! Bridges reference transforms by id (`transformId`); this module resolves
//! those ids against a name-to-pure-function registry. No dynamic code is
//! ever executed during translation: a transform is a plain Rust function
//! over one JSON value.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

pub mod built_in;

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// A pure transform over one JSON value
pub type TransformFn = Arc<dyn Fn(&Value) -> Result<Value, TransformError> + Send + Sync>;

/// Errors raised while resolving or applying a transform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// No transform registered under this name
    #[error("Transform '{name}' is not registered")]
    Unknown { name: String },

    /// The transform rejected its input
    #[error("Transform '{name}' failed: {message}")]
    Failed { name: String, message: String },
}

impl TransformError {
    /// Create a failure for the named transform
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Registry resolving transform ids to functions
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, TransformFn>,
}

impl TransformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in transforms
    pub fn with_built_ins() -> Self {
        let mut registry = Self::new();
        registry.register("lowercase", Arc::new(built_in::lowercase));
        registry.register("uppercase", Arc::new(built_in::uppercase));
        registry.register("trim", Arc::new(built_in::trim));
        registry.register("slugify", Arc::new(built_in::slugify));
        registry.register("to_string", Arc::new(built_in::to_string));
        registry.register("to_number", Arc::new(built_in::to_number));
        registry.register("round", Arc::new(built_in::round));
        registry.register("normalize_url", Arc::new(built_in::normalize_url));
        registry.register("url_host", Arc::new(built_in::url_host));
        registry.register("epoch_to_rfc3339", Arc::new(built_in::epoch_to_rfc3339));
        registry
    }

    /// Register a transform under a name, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, transform: TransformFn) {
        self.transforms.insert(name.into(), transform);
    }

    /// Apply the named transform to a value
    pub fn apply(&self, name: &str, value: &Value) -> Result<Value, TransformError> {
        let transform = self
            .transforms
            .get(name)
            .ok_or_else(|| TransformError::Unknown {
                name: name.to_string(),
            })?;
        transform(value)
    }

    /// Whether a transform is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered transform names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.transforms.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_built_ins_are_registered() {
        let registry = TransformRegistry::with_built_ins();
        for name in [
            "lowercase",
            "uppercase",
            "trim",
            "slugify",
            "to_string",
            "to_number",
            "round",
            "normalize_url",
            "url_host",
            "epoch_to_rfc3339",
        ] {
            assert!(registry.contains(name), "missing built-in '{}'", name);
        }
    }

    #[test]
    fn test_apply_unknown_transform_fails() {
        let registry = TransformRegistry::new();
        assert_eq!(
            registry.apply("nope", &json!("x")).unwrap_err(),
            TransformError::Unknown {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_apply_built_in() {
        let registry = TransformRegistry::with_built_ins();
        assert_eq!(
            registry.apply("lowercase", &json!("MiXeD")).unwrap(),
            json!("mixed")
        );
    }

    #[test]
    fn test_register_custom_transform() {
        let mut registry = TransformRegistry::new();
        registry.register(
            "double",
            Arc::new(|value: &Value| {
                value
                    .as_f64()
                    .and_then(|n| serde_json::Number::from_f64(n * 2.0))
                    .map(Value::Number)
                    .ok_or_else(|| TransformError::failed("double", "expected a number"))
            }),
        );

        assert_eq!(registry.apply("double", &json!(21)).unwrap(), json!(42.0));
        assert!(registry.apply("double", &json!("x")).is_err());
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = TransformRegistry::new();
        registry.register("zeta", Arc::new(built_in::trim));
        registry.register("alpha", Arc::new(built_in::trim));
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}
