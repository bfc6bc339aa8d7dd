//! Execution context threaded through pipeline stages
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// The data envelope flowing through a translation or pipeline run
///
/// `source` and `target` name the models the payload moves between.
/// `options` carries caller knobs (e.g. a "validate" flag), `metadata`
/// carries free-form annotations; neither is interpreted by the engine
/// itself. The cancellation token is shared across every clone of the
/// context, so cancelling it stops a pipeline between stages no matter
/// which stage's copy triggered the check.
#[derive(Debug, Clone)]
pub struct EtlContext {
    pub source: String,
    pub target: String,
    pub data: Value,
    pub options: BTreeMap<String, Value>,
    pub metadata: BTreeMap<String, Value>,
    cancellation: CancellationToken,
}

impl EtlContext {
    /// Create a context for a source-to-target run over a payload
    pub fn new(source: impl Into<String>, target: impl Into<String>, data: Value) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            data,
            options: BTreeMap::new(),
            metadata: BTreeMap::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Set a caller option
    pub fn with_option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    /// Attach a free-form metadata entry
    pub fn with_metadata(mut self, name: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(name.into(), value);
        self
    }

    /// Thread an externally owned cancellation token through the run
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Clone the context with a new payload, keeping everything else
    ///
    /// This is how a pipeline feeds one stage's output into the next:
    /// same route, same options, same cancellation token, new `data`.
    pub fn with_data(&self, data: Value) -> Self {
        let mut next = self.clone();
        next.data = data;
        next
    }

    /// Look up a caller option by name
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Look up a boolean option, `None` when absent or not a boolean
    pub fn bool_option(&self, name: &str) -> Option<bool> {
        self.options.get(name).and_then(Value::as_bool)
    }

    /// The shared cancellation token for this run
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether the run has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
