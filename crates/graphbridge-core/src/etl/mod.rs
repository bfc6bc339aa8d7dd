//! ETL pipeline engine
//!
//! Translation runs either directly through one [`BridgeComponent`] or
//! through a [`Pipeline`] chaining several components, each implementing
//! the [`EtlComponent`] contract. Execution is strictly sequential and
//! fail-fast, with statistics aggregated additively across stages.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

pub mod bridge;
pub mod component;
pub mod context;
pub mod pipeline;
pub mod result;

pub use bridge::BridgeComponent;
pub use component::EtlComponent;
pub use context::EtlContext;
pub use pipeline::Pipeline;
pub use result::{EtlMetadata, EtlResult, EtlResultBuilder, EtlStats};
