//! Data-model registry
//!
//! A [`Model`] is a named, versioned graph schema plus its declared
//! compatibility edges. The [`ModelRegistry`] owns the name-to-model map,
//! schema-validates on registration, and answers compatibility queries
//! over the declared edges only (no transitive traversal).

use crate::error::{Error, Result};
use graphbridge_schemas::{GraphSchema, GraphSchemaValidator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Declared compatibility edges of one model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelCompatibility {
    /// Models this one is interchangeable with, both directions
    pub direct_compatible: Vec<String>,
    /// Models whose data can be translated into this one
    pub translatable_from: Vec<String>,
    /// Models this one's data can be translated into
    pub translatable_to: Vec<String>,
}

/// A named, versioned data-model schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub version: String,
    pub schema: GraphSchema,
    #[serde(default)]
    pub compatibility: ModelCompatibility,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

/// Direction filter for compatibility queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatDirection {
    /// Models data can arrive from
    From,
    /// Models data can go to
    To,
    /// Union of both directions
    Either,
}

/// Registry of named models
///
/// Interior RwLock so shared handles can register and query concurrently;
/// all methods take `&self`.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<BTreeMap<String, Arc<Model>>>,
    validator: GraphSchemaValidator,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new model
    ///
    /// The model's schema must pass structural validation, and the name
    /// must not already be taken.
    pub fn register_model(&self, model: Model) -> Result<()> {
        self.validator
            .validate(&model.schema)
            .map_err(|source| Error::Schema {
                model: model.name.clone(),
                source,
            })?;

        let mut models = self
            .models
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if models.contains_key(&model.name) {
            return Err(Error::DuplicateModel { name: model.name });
        }

        log::debug!("registered model '{}' (version {})", model.name, model.version);
        models.insert(model.name.clone(), Arc::new(model));
        Ok(())
    }

    /// Replace a model, registering it if absent
    ///
    /// Deliberate upsert for callers that know they are overwriting; the
    /// schema is still validated.
    pub fn replace_model(&self, model: Model) -> Result<()> {
        self.validator
            .validate(&model.schema)
            .map_err(|source| Error::Schema {
                model: model.name.clone(),
                source,
            })?;

        let mut models = self
            .models
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        log::debug!("replaced model '{}' (version {})", model.name, model.version);
        models.insert(model.name.clone(), Arc::new(model));
        Ok(())
    }

    /// Look up a model by name
    pub fn get_model(&self, name: &str) -> Result<Arc<Model>> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ModelNotFound {
                name: name.to_string(),
            })
    }

    /// Model names directly reachable from `name` via declared edges
    ///
    /// Only the model's own declarations are consulted; edges are not
    /// followed transitively.
    pub fn compatible_models(
        &self,
        name: &str,
        direction: CompatDirection,
    ) -> Result<BTreeSet<String>> {
        let model = self.get_model(name)?;
        let compat = &model.compatibility;

        let mut names: BTreeSet<String> = compat.direct_compatible.iter().cloned().collect();
        match direction {
            CompatDirection::From => {
                names.extend(compat.translatable_from.iter().cloned());
            }
            CompatDirection::To => {
                names.extend(compat.translatable_to.iter().cloned());
            }
            CompatDirection::Either => {
                names.extend(compat.translatable_from.iter().cloned());
                names.extend(compat.translatable_to.iter().cloned());
            }
        }

        Ok(names)
    }

    /// All registered model names, sorted
    pub fn model_names(&self) -> Vec<String> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Whether a model with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_model(name: &str) -> Model {
        serde_json::from_value(json!({
            "name": name,
            "version": "1.0",
            "schema": {
                "entities": {
                    "record": {"fields": {"id": {"type": "string"}}}
                }
            }
        }))
        .unwrap()
    }

    fn create_test_model_with_edges(
        name: &str,
        direct: &[&str],
        from: &[&str],
        to: &[&str],
    ) -> Model {
        let mut model = create_test_model(name);
        model.compatibility = ModelCompatibility {
            direct_compatible: direct.iter().map(|s| s.to_string()).collect(),
            translatable_from: from.iter().map(|s| s.to_string()).collect(),
            translatable_to: to.iter().map(|s| s.to_string()).collect(),
        };
        model
    }

    #[test]
    fn test_register_and_get() {
        let registry = ModelRegistry::new();
        registry.register_model(create_test_model("content")).unwrap();

        let model = registry.get_model("content").unwrap();
        assert_eq!(model.name, "content");
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("content"));
    }

    #[test]
    fn test_get_unknown_model_fails() {
        let registry = ModelRegistry::new();
        assert!(matches!(
            registry.get_model("ghost"),
            Err(Error::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = ModelRegistry::new();
        registry.register_model(create_test_model("content")).unwrap();

        let err = registry
            .register_model(create_test_model("content"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateModel { name } if name == "content"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_schema_is_rejected() {
        let registry = ModelRegistry::new();
        let model: Model = serde_json::from_value(json!({
            "name": "broken",
            "version": "1.0",
            "schema": {
                "entities": {},
                "relationships": {
                    "r": {"from": "ghost", "to": "phantom"}
                }
            }
        }))
        .unwrap();

        let err = registry.register_model(model).unwrap_err();
        assert!(matches!(err, Error::Schema { model, .. } if model == "broken"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_model_upserts() {
        let registry = ModelRegistry::new();
        registry.register_model(create_test_model("content")).unwrap();

        let mut updated = create_test_model("content");
        updated.version = "2.0".to_string();
        registry.replace_model(updated).unwrap();

        assert_eq!(registry.get_model("content").unwrap().version, "2.0");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replace_model_still_validates() {
        let registry = ModelRegistry::new();
        registry.register_model(create_test_model("content")).unwrap();

        let mut broken = create_test_model("content");
        broken.schema = serde_json::from_value(json!({
            "entities": {},
            "relationships": {"r": {"from": "a", "to": "b"}}
        }))
        .unwrap();

        assert!(registry.replace_model(broken).is_err());
        assert_eq!(registry.get_model("content").unwrap().version, "1.0");
    }

    #[test]
    fn test_compatible_models_directions() {
        let registry = ModelRegistry::new();
        registry
            .register_model(create_test_model_with_edges(
                "content",
                &["common"],
                &["legacy"],
                &["asset"],
            ))
            .unwrap();

        let to = registry
            .compatible_models("content", CompatDirection::To)
            .unwrap();
        assert_eq!(to, ["asset", "common"].map(String::from).into());

        let from = registry
            .compatible_models("content", CompatDirection::From)
            .unwrap();
        assert_eq!(from, ["common", "legacy"].map(String::from).into());

        let either = registry
            .compatible_models("content", CompatDirection::Either)
            .unwrap();
        assert_eq!(either, ["asset", "common", "legacy"].map(String::from).into());
    }

    #[test]
    fn test_compatible_models_is_not_transitive() {
        let registry = ModelRegistry::new();
        registry
            .register_model(create_test_model_with_edges("content", &[], &[], &["asset"]))
            .unwrap();
        registry
            .register_model(create_test_model_with_edges("asset", &[], &[], &["media"]))
            .unwrap();

        let to = registry
            .compatible_models("content", CompatDirection::To)
            .unwrap();
        assert!(to.contains("asset"));
        assert!(!to.contains("media"));
    }

    #[test]
    fn test_compatible_models_unknown_name_fails() {
        let registry = ModelRegistry::new();
        assert!(matches!(
            registry.compatible_models("ghost", CompatDirection::Either),
            Err(Error::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_model_names_are_sorted() {
        let registry = ModelRegistry::new();
        registry.register_model(create_test_model("zeta")).unwrap();
        registry.register_model(create_test_model("alpha")).unwrap();
        assert_eq!(registry.model_names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_compatibility_wire_casing() {
        let compat: ModelCompatibility = serde_json::from_value(json!({
            "directCompatible": ["a"],
            "translatableFrom": ["b"],
            "translatableTo": ["c"]
        }))
        .unwrap();
        assert_eq!(compat.direct_compatible, vec!["a"]);
        assert_eq!(
            serde_json::to_value(&compat).unwrap(),
            json!({
                "directCompatible": ["a"],
                "translatableFrom": ["b"],
                "translatableTo": ["c"]
            })
        );
    }
}
