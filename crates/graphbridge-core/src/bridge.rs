//! Bridge definitions and the bridge registry
//!
//! A [`Bridge`] is a directional translation recipe between two named
//! models: target-field mappings, bridge-level transformations, and
//! quality metadata. The [`BridgeRegistry`] stores bridges by id with
//! upsert semantics and answers directional lookups and model-graph
//! discovery queries. Persistence is the caller's concern; the registry
//! itself never touches the filesystem.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

/// How one target field obtains its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRule {
    /// Bare source path: copy the value as-is
    Copy(String),
    /// Copy from a source path, then apply a named transform
    #[serde(rename_all = "camelCase")]
    Transform {
        source_path: String,
        transform_id: String,
    },
    /// Fixed value regardless of the input record
    Constant { value: Value },
}

/// Quality metadata carried by a bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeMetadata {
    /// Fraction of source information preserved, 0 to 1
    pub efficiency: f64,
    /// Trust in the mapping's correctness, 0 to 1
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
}

impl Default for BridgeMetadata {
    fn default() -> Self {
        Self {
            efficiency: 1.0,
            confidence: 1.0,
            last_updated: Utc::now(),
        }
    }
}

/// A directional translation recipe between two models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub id: String,
    pub version: String,
    /// Model name the bridge translates from
    pub source: String,
    /// Model name the bridge translates to
    pub target: String,
    /// Target field path to the rule producing its value
    #[serde(default)]
    pub mappings: BTreeMap<String, FieldRule>,
    /// Target field name to a transform applied after its mapping rule
    #[serde(default)]
    pub transformations: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: BridgeMetadata,
}

#[derive(Debug, Default)]
struct RegistryInner {
    bridges: BTreeMap<String, Arc<Bridge>>,
    /// Ids in first-registration order; upserts keep the original slot
    order: Vec<String>,
}

/// Registry of translation bridges
///
/// Interior RwLock so shared handles can register and query concurrently;
/// all methods take `&self`.
#[derive(Debug, Default)]
pub struct BridgeRegistry {
    inner: RwLock<RegistryInner>,
}

impl BridgeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bridge, replacing any existing definition with the same id
    ///
    /// The bridge must pass the structural checks of [`validate`]. The
    /// check is presence-only by design: mappings are not cross-checked
    /// against the referenced models' schemas.
    ///
    /// [`validate`]: BridgeRegistry::validate
    pub fn register(&self, bridge: Bridge) -> Result<()> {
        if let Err(reason) = structural_check(&bridge) {
            return Err(Error::BridgeValidation {
                bridge_id: bridge.id,
                reason,
            });
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.bridges.contains_key(&bridge.id) {
            inner.order.push(bridge.id.clone());
        }
        log::debug!(
            "registered bridge '{}' ({} -> {})",
            bridge.id,
            bridge.source,
            bridge.target
        );
        inner.bridges.insert(bridge.id.clone(), Arc::new(bridge));
        Ok(())
    }

    /// Whether a bridge passes the structural checks, without mutating state
    pub fn validate(&self, bridge: &Bridge) -> bool {
        structural_check(bridge).is_ok()
    }

    /// Find a bridge translating `source` to `target`
    ///
    /// Exact, case-sensitive, directional, single-hop. When several
    /// bridges connect the same pair the earliest-registered one wins.
    pub fn get_bridge(&self, source: &str, target: &str) -> Option<Arc<Bridge>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.order.iter().find_map(|id| {
            inner
                .bridges
                .get(id)
                .filter(|bridge| bridge.source == source && bridge.target == target)
                .cloned()
        })
    }

    /// Look up a bridge by id
    pub fn bridge_by_id(&self, id: &str) -> Option<Arc<Bridge>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .bridges
            .get(id)
            .cloned()
    }

    /// All bridges in first-registration order, reflecting the latest upserts
    pub fn bridges(&self) -> Vec<Arc<Bridge>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter_map(|id| inner.bridges.get(id).cloned())
            .collect()
    }

    /// Models linked to `name` by any bridge edge in either direction
    ///
    /// `name` itself is excluded from the result.
    pub fn connected_models(&self, name: &str) -> BTreeSet<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut connected = BTreeSet::new();
        for bridge in inner.bridges.values() {
            if bridge.source == name {
                connected.insert(bridge.target.clone());
            }
            if bridge.target == name {
                connected.insert(bridge.source.clone());
            }
        }
        connected.remove(name);
        connected
    }

    /// All model names mentioned by any registered bridge
    pub fn known_models(&self) -> BTreeSet<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut names = BTreeSet::new();
        for bridge in inner.bridges.values() {
            names.insert(bridge.source.clone());
            names.insert(bridge.target.clone());
        }
        names
    }

    /// Number of registered bridges
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .bridges
            .len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Presence-only structural checks shared by register and validate
fn structural_check(bridge: &Bridge) -> std::result::Result<(), String> {
    if bridge.id.is_empty() {
        return Err("id must be non-empty".to_string());
    }
    if bridge.version.is_empty() {
        return Err("version must be non-empty".to_string());
    }
    if bridge.source.is_empty() {
        return Err("source must be non-empty".to_string());
    }
    if bridge.target.is_empty() {
        return Err("target must be non-empty".to_string());
    }

    for (target_path, rule) in &bridge.mappings {
        if target_path.is_empty() {
            return Err("mappings contain an empty target path".to_string());
        }
        match rule {
            FieldRule::Copy(source_path) if source_path.is_empty() => {
                return Err(format!("mapping '{}' has an empty source path", target_path));
            }
            FieldRule::Transform {
                source_path,
                transform_id,
            } => {
                if source_path.is_empty() {
                    return Err(format!("mapping '{}' has an empty source path", target_path));
                }
                if transform_id.is_empty() {
                    return Err(format!("mapping '{}' has an empty transform id", target_path));
                }
            }
            _ => {}
        }
    }

    for (field, transform_id) in &bridge.transformations {
        if field.is_empty() {
            return Err("transformations contain an empty field name".to_string());
        }
        if transform_id.is_empty() {
            return Err(format!("transformation '{}' has an empty transform id", field));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_bridge(id: &str, source: &str, target: &str) -> Bridge {
        Bridge {
            id: id.to_string(),
            version: "1.0".to_string(),
            source: source.to_string(),
            target: target.to_string(),
            mappings: BTreeMap::from([(
                "url".to_string(),
                FieldRule::Copy("content".to_string()),
            )]),
            transformations: BTreeMap::new(),
            metadata: BridgeMetadata::default(),
        }
    }

    #[test]
    fn test_register_and_lookup_is_directional() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("b1", "content", "asset"))
            .unwrap();

        assert!(registry.get_bridge("content", "asset").is_some());
        assert!(registry.get_bridge("asset", "content").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("b1", "content", "asset"))
            .unwrap();

        assert!(registry.get_bridge("Content", "asset").is_none());
    }

    #[test]
    fn test_register_is_an_upsert() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("b1", "content", "asset"))
            .unwrap();

        let mut replacement = create_test_bridge("b1", "content", "asset");
        replacement.mappings = BTreeMap::from([(
            "href".to_string(),
            FieldRule::Copy("content".to_string()),
        )]);
        registry.register(replacement).unwrap();

        assert_eq!(registry.len(), 1);
        let bridge = registry.get_bridge("content", "asset").unwrap();
        assert!(bridge.mappings.contains_key("href"));
        assert!(!bridge.mappings.contains_key("url"));
    }

    #[test]
    fn test_upsert_keeps_first_registration_position() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("b1", "content", "asset"))
            .unwrap();
        registry
            .register(create_test_bridge("b2", "content", "interaction"))
            .unwrap();

        let mut replacement = create_test_bridge("b1", "content", "asset");
        replacement.version = "2.0".to_string();
        registry.register(replacement).unwrap();

        let bridges = registry.bridges();
        assert_eq!(bridges.len(), 2);
        assert_eq!(bridges[0].id, "b1");
        assert_eq!(bridges[0].version, "2.0");
        assert_eq!(bridges[1].id, "b2");
    }

    #[test]
    fn test_earliest_registered_bridge_wins_lookup() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("first", "content", "asset"))
            .unwrap();
        registry
            .register(create_test_bridge("second", "content", "asset"))
            .unwrap();

        assert_eq!(registry.get_bridge("content", "asset").unwrap().id, "first");
    }

    #[test]
    fn test_validate_checks_presence_only() {
        let registry = BridgeRegistry::new();
        assert!(registry.validate(&create_test_bridge("b1", "content", "asset")));

        let mut empty_id = create_test_bridge("", "content", "asset");
        assert!(!registry.validate(&empty_id));
        empty_id.id = "b1".to_string();
        empty_id.target = String::new();
        assert!(!registry.validate(&empty_id));

        // Referencing models nobody registered is structurally fine
        assert!(registry.validate(&create_test_bridge("b2", "nobody", "knows-these")));
    }

    #[test]
    fn test_validate_rejects_empty_rule_parts() {
        let registry = BridgeRegistry::new();

        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings = BTreeMap::from([(
            "url".to_string(),
            FieldRule::Transform {
                source_path: "content".to_string(),
                transform_id: String::new(),
            },
        )]);
        assert!(!registry.validate(&bridge));

        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings = BTreeMap::from([("url".to_string(), FieldRule::Copy(String::new()))]);
        assert!(!registry.validate(&bridge));

        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.transformations = BTreeMap::from([("url".to_string(), String::new())]);
        assert!(!registry.validate(&bridge));
    }

    #[test]
    fn test_register_rejects_invalid_bridge() {
        let registry = BridgeRegistry::new();
        let err = registry
            .register(create_test_bridge("", "content", "asset"))
            .unwrap_err();
        assert!(matches!(err, Error::BridgeValidation { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_maps_are_valid() {
        let registry = BridgeRegistry::new();
        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings = BTreeMap::new();
        bridge.transformations = BTreeMap::new();
        assert!(registry.validate(&bridge));
    }

    #[test]
    fn test_connected_models_either_direction() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("b1", "content", "asset"))
            .unwrap();
        registry
            .register(create_test_bridge("b2", "content", "interaction"))
            .unwrap();

        assert_eq!(
            registry.connected_models("content"),
            ["asset", "interaction"].map(String::from).into()
        );
        assert_eq!(
            registry.connected_models("asset"),
            ["content"].map(String::from).into()
        );
        assert!(registry.connected_models("ghost").is_empty());
    }

    #[test]
    fn test_known_models() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("b1", "content", "asset"))
            .unwrap();
        registry
            .register(create_test_bridge("b2", "asset", "media"))
            .unwrap();

        assert_eq!(
            registry.known_models(),
            ["asset", "content", "media"].map(String::from).into()
        );
    }

    #[test]
    fn test_bridge_by_id() {
        let registry = BridgeRegistry::new();
        registry
            .register(create_test_bridge("b1", "content", "asset"))
            .unwrap();

        assert_eq!(registry.bridge_by_id("b1").unwrap().id, "b1");
        assert!(registry.bridge_by_id("b2").is_none());
    }

    #[test]
    fn test_field_rule_wire_forms() {
        let copy: FieldRule = serde_json::from_value(json!("content")).unwrap();
        assert_eq!(copy, FieldRule::Copy("content".to_string()));
        assert_eq!(serde_json::to_value(&copy).unwrap(), json!("content"));

        let transform: FieldRule = serde_json::from_value(json!({
            "sourcePath": "content",
            "transformId": "normalize_url"
        }))
        .unwrap();
        assert_eq!(
            transform,
            FieldRule::Transform {
                source_path: "content".to_string(),
                transform_id: "normalize_url".to_string(),
            }
        );

        let constant: FieldRule = serde_json::from_value(json!({"value": 42})).unwrap();
        assert_eq!(
            constant,
            FieldRule::Constant {
                value: json!(42)
            }
        );
    }

    #[test]
    fn test_bridge_store_record_round_trip() {
        let record = json!({
            "id": "content-to-asset",
            "version": "1.2",
            "source": "content",
            "target": "asset",
            "mappings": {
                "url": "content",
                "slug": {"sourcePath": "title", "transformId": "slugify"}
            },
            "transformations": {"url": "normalize_url"},
            "metadata": {
                "efficiency": 0.9,
                "confidence": 0.8,
                "lastUpdated": "2025-03-01T12:00:00Z"
            }
        });

        let bridge: Bridge = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(bridge.metadata.efficiency, 0.9);
        assert_eq!(serde_json::to_value(&bridge).unwrap(), record);
    }
}
