//! BridgeComponent, the stage that translates records through a bridge
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use super::{EtlComponent, EtlContext, EtlResult, EtlResultBuilder};
use crate::bridge::{Bridge, BridgeRegistry, FieldRule};
use crate::error::{Error, RecordError, Result};
use crate::fieldpath::{value_kind, FieldPath};
use crate::transform::TransformRegistry;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// An ETL stage bound to one bridge
///
/// The component keeps the registry handle and re-resolves the bridge by
/// id on every call, so upserting a bridge's rules between calls takes
/// effect without rebuilding components (hot reload).
pub struct BridgeComponent {
    bridge: Arc<Bridge>,
    registry: Arc<BridgeRegistry>,
    transforms: Arc<TransformRegistry>,
}

impl BridgeComponent {
    /// Bind a component to a specific bridge
    pub fn new(
        bridge: Arc<Bridge>,
        registry: Arc<BridgeRegistry>,
        transforms: Arc<TransformRegistry>,
    ) -> Self {
        Self {
            bridge,
            registry,
            transforms,
        }
    }

    /// Bind a component to whichever bridge serves a route
    pub fn for_route(
        registry: &Arc<BridgeRegistry>,
        transforms: &Arc<TransformRegistry>,
        source: &str,
        target: &str,
    ) -> Result<Self> {
        let bridge = registry
            .get_bridge(source, target)
            .ok_or_else(|| Error::BridgeNotFound {
                source: source.to_string(),
                target: target.to_string(),
            })?;
        Ok(Self::new(
            bridge,
            Arc::clone(registry),
            Arc::clone(transforms),
        ))
    }

    /// The bridge definition currently registered under this id
    fn current_bridge(&self) -> Arc<Bridge> {
        self.registry
            .bridge_by_id(&self.bridge.id)
            .unwrap_or_else(|| Arc::clone(&self.bridge))
    }
}

#[async_trait]
impl EtlComponent for BridgeComponent {
    fn id(&self) -> &str {
        &self.bridge.id
    }

    fn version(&self) -> &str {
        &self.bridge.version
    }

    fn validate(&self, context: &EtlContext) -> bool {
        let bridge = self.current_bridge();
        context.source == bridge.source && context.target == bridge.target
    }

    async fn execute(&self, context: EtlContext) -> Result<EtlResult> {
        let bridge = self.current_bridge();
        let mut builder = EtlResultBuilder::for_route(&context.source, &context.target);
        let mut errors: Vec<RecordError> = Vec::new();

        let data = match &context.data {
            Value::Array(records) => {
                let mut translated = Vec::with_capacity(records.len());
                for (index, record) in records.iter().enumerate() {
                    match translate_record(&bridge, &self.transforms, index, record) {
                        Ok(output) => {
                            builder.record_success();
                            translated.push(output);
                        }
                        Err(error) => {
                            log::warn!("bridge '{}' dropped {}", bridge.id, error);
                            builder.record_failure();
                            errors.push(error);
                        }
                    }
                }
                Value::Array(translated)
            }
            record => match translate_record(&bridge, &self.transforms, 0, record) {
                Ok(output) => {
                    builder.record_success();
                    output
                }
                Err(error) => {
                    log::warn!("bridge '{}' dropped {}", bridge.id, error);
                    builder.record_failure();
                    errors.push(error);
                    Value::Null
                }
            },
        };

        let stats = builder.stats();
        if stats.succeeded == 0 && stats.processed > 0 {
            return Err(Error::TranslationFailed {
                bridge_id: bridge.id.clone(),
                processed: stats.processed,
                errors,
            });
        }

        Ok(builder.with_data(data).build())
    }
}

/// Translate one record through the bridge's mapping rules
///
/// Any failing rule fails the whole record; a source path that resolves
/// to nothing just omits the target field. Mappings run in key order,
/// so output construction is deterministic.
fn translate_record(
    bridge: &Bridge,
    transforms: &TransformRegistry,
    index: usize,
    record: &Value,
) -> std::result::Result<Value, RecordError> {
    if !record.is_object() {
        return Err(RecordError::record(
            index,
            format!("expected an object record, found {}", value_kind(record)),
        ));
    }

    let mut output = Value::Object(Map::new());
    for (target_field, rule) in &bridge.mappings {
        let fail = |message: String| RecordError::field(index, target_field.clone(), message);

        let resolved = match rule {
            FieldRule::Copy(source_path) => {
                let path = FieldPath::parse(source_path).map_err(|e| fail(e.to_string()))?;
                match path.resolve(record) {
                    Some(value) => value.clone(),
                    None => continue,
                }
            }
            FieldRule::Transform {
                source_path,
                transform_id,
            } => {
                let path = FieldPath::parse(source_path).map_err(|e| fail(e.to_string()))?;
                match path.resolve(record) {
                    Some(value) => transforms
                        .apply(transform_id, value)
                        .map_err(|e| fail(e.to_string()))?,
                    None => continue,
                }
            }
            FieldRule::Constant { value } => value.clone(),
        };

        let target_path = FieldPath::parse(target_field).map_err(|e| fail(e.to_string()))?;
        let resolved = match target_path
            .last_key()
            .and_then(|key| bridge.transformations.get(key))
        {
            Some(transform_id) => transforms
                .apply(transform_id, &resolved)
                .map_err(|e| fail(e.to_string()))?,
            None => resolved,
        };

        target_path
            .assign(&mut output, resolved)
            .map_err(|e| fail(e.to_string()))?;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeMetadata;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn create_test_bridge(id: &str, source: &str, target: &str) -> Bridge {
        let mut mappings = BTreeMap::new();
        mappings.insert("url".to_string(), FieldRule::Copy("content".to_string()));
        Bridge {
            id: id.to_string(),
            version: "1.0".to_string(),
            source: source.to_string(),
            target: target.to_string(),
            mappings,
            transformations: BTreeMap::new(),
            metadata: BridgeMetadata::default(),
        }
    }

    fn create_test_component(bridge: Bridge) -> BridgeComponent {
        let registry = Arc::new(BridgeRegistry::new());
        registry.register(bridge.clone()).unwrap();
        let transforms = Arc::new(TransformRegistry::with_built_ins());
        BridgeComponent::new(Arc::new(bridge), registry, transforms)
    }

    #[test]
    fn test_validate_matches_route_only() {
        let component = create_test_component(create_test_bridge("b1", "content", "asset"));

        assert!(component.validate(&EtlContext::new("content", "asset", Value::Null)));
        assert!(!component.validate(&EtlContext::new("asset", "content", Value::Null)));
        assert!(!component.validate(&EtlContext::new("content", "interaction", Value::Null)));
    }

    #[tokio::test]
    async fn test_single_record_translation() {
        let component = create_test_component(create_test_bridge("b1", "content", "asset"));
        let context = EtlContext::new("content", "asset", json!({"content": "https://x/y.png"}));

        let result = component.execute(context).await.unwrap();

        assert_eq!(result.data, json!({"url": "https://x/y.png"}));
        assert_eq!(result.metadata.stats.processed, 1);
        assert_eq!(result.metadata.stats.succeeded, 1);
        assert_eq!(result.metadata.stats.failed, 0);
    }

    #[tokio::test]
    async fn test_batch_partial_failure_omits_failed_records() {
        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings.insert(
            "name".to_string(),
            FieldRule::Transform {
                source_path: "title".to_string(),
                transform_id: "lowercase".to_string(),
            },
        );
        let component = create_test_component(bridge);

        // Records 3 and 7 carry a non-string title, which fails lowercase.
        let records: Vec<Value> = (0..10)
            .map(|i| {
                if i == 3 || i == 7 {
                    json!({"content": format!("https://x/{i}.png"), "title": i})
                } else {
                    json!({"content": format!("https://x/{i}.png"), "title": format!("Item {i}")})
                }
            })
            .collect();
        let context = EtlContext::new("content", "asset", Value::Array(records));

        let result = component.execute(context).await.unwrap();

        assert_eq!(result.metadata.stats.processed, 10);
        assert_eq!(result.metadata.stats.succeeded, 8);
        assert_eq!(result.metadata.stats.failed, 2);
        let output = result.data.as_array().unwrap();
        assert_eq!(output.len(), 8);
        assert_eq!(output[0]["name"], json!("item 0"));
        assert_eq!(output[3]["url"], json!("https://x/4.png"));
    }

    #[tokio::test]
    async fn test_total_failure_rejects_with_record_errors() {
        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings.insert(
            "url".to_string(),
            FieldRule::Transform {
                source_path: "content".to_string(),
                transform_id: "no_such_transform".to_string(),
            },
        );
        let component = create_test_component(bridge);
        let records = json!([{"content": "a"}, {"content": "b"}]);
        let context = EtlContext::new("content", "asset", records);

        let error = component.execute(context).await.unwrap_err();
        match error {
            Error::TranslationFailed {
                bridge_id,
                processed,
                errors,
            } => {
                assert_eq!(bridge_id, "b1");
                assert_eq!(processed, 2);
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].index, 0);
                assert_eq!(errors[0].field.as_deref(), Some("url"));
            }
            other => panic!("expected TranslationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_a_failure() {
        let component = create_test_component(create_test_bridge("b1", "content", "asset"));
        let context = EtlContext::new("content", "asset", json!([]));

        let result = component.execute(context).await.unwrap();

        assert_eq!(result.data, json!([]));
        assert_eq!(result.metadata.stats, crate::etl::EtlStats::default());
    }

    #[tokio::test]
    async fn test_missing_source_field_is_omitted() {
        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings.insert(
            "kind".to_string(),
            FieldRule::Copy("media.kind".to_string()),
        );
        let component = create_test_component(bridge);
        let context = EtlContext::new("content", "asset", json!({"content": "https://x/y.png"}));

        let result = component.execute(context).await.unwrap();

        assert_eq!(result.data, json!({"url": "https://x/y.png"}));
        assert!(result.data.get("kind").is_none());
    }

    #[tokio::test]
    async fn test_constant_and_target_transformation() {
        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings.insert(
            "origin".to_string(),
            FieldRule::Constant {
                value: json!("  Imported  "),
            },
        );
        bridge
            .transformations
            .insert("origin".to_string(), "trim".to_string());
        let component = create_test_component(bridge);
        let context = EtlContext::new("content", "asset", json!({"content": "https://x/y.png"}));

        let result = component.execute(context).await.unwrap();

        assert_eq!(result.data["origin"], json!("Imported"));
        assert_eq!(result.data["url"], json!("https://x/y.png"));
    }

    #[tokio::test]
    async fn test_nested_target_paths_build_structure() {
        let mut bridge = create_test_bridge("b1", "content", "asset");
        bridge.mappings.insert(
            "meta.source.host".to_string(),
            FieldRule::Transform {
                source_path: "content".to_string(),
                transform_id: "url_host".to_string(),
            },
        );
        let component = create_test_component(bridge);
        let context =
            EtlContext::new("content", "asset", json!({"content": "https://x.example/y.png"}));

        let result = component.execute(context).await.unwrap();

        assert_eq!(result.data["meta"]["source"]["host"], json!("x.example"));
    }

    #[tokio::test]
    async fn test_non_object_record_fails_that_record() {
        let component = create_test_component(create_test_bridge("b1", "content", "asset"));
        let records = json!([{"content": "https://x/a.png"}, "not a record"]);
        let context = EtlContext::new("content", "asset", records);

        let result = component.execute(context).await.unwrap();

        assert_eq!(result.metadata.stats.succeeded, 1);
        assert_eq!(result.metadata.stats.failed, 1);
        assert_eq!(result.data.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_hot_reload_uses_latest_registration() {
        let bridge = create_test_bridge("b1", "content", "asset");
        let registry = Arc::new(BridgeRegistry::new());
        registry.register(bridge.clone()).unwrap();
        let transforms = Arc::new(TransformRegistry::with_built_ins());
        let component =
            BridgeComponent::new(Arc::new(bridge.clone()), Arc::clone(&registry), transforms);

        // Re-register the same id with a different mapping.
        let mut updated = bridge;
        updated.mappings.insert(
            "url".to_string(),
            FieldRule::Transform {
                source_path: "content".to_string(),
                transform_id: "uppercase".to_string(),
            },
        );
        registry.register(updated).unwrap();

        let context = EtlContext::new("content", "asset", json!({"content": "https://x/y.png"}));
        let result = component.execute(context).await.unwrap();

        assert_eq!(result.data, json!({"url": "HTTPS://X/Y.PNG"}));
    }
}
