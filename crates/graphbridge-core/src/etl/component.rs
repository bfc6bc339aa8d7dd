//! The common contract implemented by every pipeline stage
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use super::{EtlContext, EtlResult};
use crate::Result;
use async_trait::async_trait;

/// A single stage in an ETL pipeline
///
/// `validate` is a cheap, synchronous pre-flight check against the
/// execution context and must never error; a `false` return aborts the
/// pipeline run before the stage executes. `execute` is async so stages
/// that perform their own I/O can suspend; the engine itself never
/// suspends between records.
#[async_trait]
pub trait EtlComponent: Send + Sync {
    /// Stable identifier, used in pipeline error reporting
    fn id(&self) -> &str;

    /// Component version string
    fn version(&self) -> &str;

    /// Whether this component is willing to run against the context
    fn validate(&self, context: &EtlContext) -> bool;

    /// Run the stage against the context payload
    async fn execute(&self, context: EtlContext) -> Result<EtlResult>;
}
