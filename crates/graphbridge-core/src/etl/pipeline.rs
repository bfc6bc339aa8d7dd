//! Ordered, fail-fast execution of ETL components
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use super::{EtlComponent, EtlContext, EtlResult, EtlResultBuilder, EtlStats};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// An ordered sequence of ETL components run against one context
///
/// Each stage is awaited to completion before the next starts; there is
/// no parallelism across stages. A pipeline is re-runnable: `execute`
/// borrows the component list, it never consumes it.
pub struct Pipeline {
    id: String,
    components: Vec<Arc<dyn EtlComponent>>,
    stage_timeout: Option<Duration>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            components: Vec::new(),
            stage_timeout: None,
        }
    }

    /// Bound each stage's execution time; expiry fails the run
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = Some(timeout);
        self
    }

    /// Append a component to the end of the pipeline
    pub fn add_component(&mut self, component: Arc<dyn EtlComponent>) {
        self.components.push(component);
    }

    /// Remove every component with this id; unknown ids are a no-op
    pub fn remove_component(&mut self, id: &str) {
        self.components.retain(|component| component.id() != id);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn components(&self) -> &[Arc<dyn EtlComponent>] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Run every stage in order, feeding each stage's output forward
    ///
    /// Statistics are summed additively across all stages. The first
    /// stage failure aborts the run; later stages never execute. An
    /// empty pipeline is the identity over the input payload.
    pub async fn execute(&self, context: EtlContext) -> Result<EtlResult> {
        let builder = EtlResultBuilder::for_route(&context.source, &context.target);
        let mut totals = EtlStats::default();
        let mut current = context;

        for component in &self.components {
            if current.is_cancelled() {
                return Err(Error::Cancelled {
                    pipeline_id: self.id.clone(),
                });
            }

            if !component.validate(&current) {
                return Err(Error::ComponentValidation {
                    component_id: component.id().to_string(),
                });
            }

            let execution = component.execute(current.clone());
            let stage_result = match self.stage_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, execution).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::StageTimeout {
                        component_id: component.id().to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    }),
                },
                None => execution.await,
            };

            let stage_result = stage_result.map_err(|source| Error::PipelineExecution {
                component_id: component.id().to_string(),
                source: Box::new(source),
            })?;

            totals.merge(&stage_result.metadata.stats);
            current = current.with_data(stage_result.data);
        }

        log::info!(
            "pipeline '{}' completed: {} processed, {} succeeded, {} failed",
            self.id,
            totals.processed,
            totals.succeeded,
            totals.failed
        );

        Ok(builder.with_data(current.data).with_stats(totals).build())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("id", &self.id)
            .field("stages", &self.components.iter().map(|c| c.id()).collect::<Vec<_>>())
            .field("stage_timeout", &self.stage_timeout)
            .finish()
    }
}
