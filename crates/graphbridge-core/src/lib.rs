//! Graphbridge Core - Translation engine for bridging graph data models
//!
//! This crate provides the core functionality for registering graph data
//! models, defining directional bridges between them, and translating
//! records either directly or through multi-stage ETL pipelines.
//!
//! # Main Components
//!
//! - **Error Handling**: Structured error types using `thiserror` and `anyhow`
//! - **Model Registry**: Named, versioned graph schemas with compatibility lookups
//! - **Bridge Registry**: Directional translation recipes between two models
//! - **Field Paths**: Dot and index notation addressing fields in JSON records
//! - **Transforms**: The name-to-pure-function registry bridge rules reference
//! - **ETL Engine**: BridgeComponent plus fail-fast, re-runnable pipelines
//!
//! # Example
//!
//! ```no_run
//! use graphbridge_core::{translate, BridgeRegistry, EtlContext, Result, TransformRegistry};
//! use std::sync::Arc;
//!
//! async fn example() -> Result<()> {
//!     let bridges = Arc::new(BridgeRegistry::new());
//!     let transforms = Arc::new(TransformRegistry::with_built_ins());
//!
//!     let payload = serde_json::json!({"content": "https://x/y.png"});
//!     let context = EtlContext::new("content", "asset", payload);
//!     let result = translate(&bridges, &transforms, context).await?;
//!     println!("translated {} records", result.metadata.stats.succeeded);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod bridge;
pub mod error;
pub mod etl;
pub mod fieldpath;
pub mod model;
pub mod transform;

// Re-export main types for convenience
pub use error::{Error, RecordError, Result};

pub use bridge::{Bridge, BridgeMetadata, BridgeRegistry, FieldRule};
pub use model::{CompatDirection, Model, ModelCompatibility, ModelRegistry};

pub use fieldpath::{FieldPath, FieldPathError, Segment};
pub use transform::{TransformError, TransformFn, TransformRegistry};

pub use etl::{
    BridgeComponent, EtlComponent, EtlContext, EtlMetadata, EtlResult, EtlResultBuilder, EtlStats,
    Pipeline,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Translate a payload through the bridge registered for a route
///
/// Resolves the bridge serving (source, target) from the registry, or
/// fails with [`Error::BridgeNotFound`], then runs one
/// [`BridgeComponent`] over the context payload. This is the direct
/// path; multi-stage runs go through [`Pipeline`].
pub async fn translate(
    bridges: &Arc<BridgeRegistry>,
    transforms: &Arc<TransformRegistry>,
    context: EtlContext,
) -> Result<EtlResult> {
    let component =
        BridgeComponent::for_route(bridges, transforms, &context.source, &context.target)?;
    component.execute(context).await
}
