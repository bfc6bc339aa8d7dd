//! Stage results, run statistics, and the result builder
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Record counts for one stage or one whole pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlStats {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl EtlStats {
    /// Fold another stage's counts into this total
    ///
    /// Pipeline totals are additive across all stages, not just the
    /// final one, so a late failure still shows earlier stage counts.
    pub fn merge(&mut self, other: &EtlStats) {
        self.processed += other.processed;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

/// Metadata describing one execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlMetadata {
    /// RFC 3339 timestamp captured when the run started
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub source: String,
    pub target: String,
    pub stats: EtlStats,
}

/// The output of one component or pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlResult {
    pub data: Value,
    pub metadata: EtlMetadata,
}

/// Builder for EtlResult instances
///
/// Captures the start instant at construction so `build` can fill in
/// `duration_ms` without callers doing their own timing.
#[derive(Debug)]
pub struct EtlResultBuilder {
    data: Option<Value>,
    timestamp: String,
    source: String,
    target: String,
    stats: EtlStats,
    start_time: Option<Instant>,
}

impl EtlResultBuilder {
    /// Start building a result for a source-to-target run
    pub fn for_route(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            data: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: source.into(),
            target: target.into(),
            stats: EtlStats::default(),
            start_time: Some(Instant::now()),
        }
    }

    /// Set the output payload
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Replace the accumulated statistics wholesale
    pub fn with_stats(mut self, stats: EtlStats) -> Self {
        self.stats = stats;
        self
    }

    /// Count one successfully translated record
    pub fn record_success(&mut self) {
        self.stats.processed += 1;
        self.stats.succeeded += 1;
    }

    /// Count one failed record
    pub fn record_failure(&mut self) {
        self.stats.processed += 1;
        self.stats.failed += 1;
    }

    /// The statistics accumulated so far
    pub fn stats(&self) -> EtlStats {
        self.stats
    }

    /// Finish the result, computing the elapsed duration
    pub fn build(self) -> EtlResult {
        EtlResult {
            data: self.data.unwrap_or(Value::Null),
            metadata: EtlMetadata {
                timestamp: self.timestamp,
                duration_ms: self
                    .start_time
                    .map(|start| start.elapsed().as_millis() as u64),
                source: self.source,
                target: self.target,
                stats: self.stats,
            },
        }
    }
}
