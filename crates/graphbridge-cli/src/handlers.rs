//! Command handlers for CLI subcommands
//!
//! Each subcommand group lives in its own submodule; this module carries
//! the shared application context and the helpers common to all of them.

pub mod bridge;
pub mod completions;
pub mod graph;
pub mod model;

pub use bridge::handle_bridge;
pub use completions::handle_completions;
pub use graph::handle_graph;
pub use model::handle_model;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::ModelLibrary;
use crate::output::OutputWriter;
use crate::store::BridgeStore;
use graphbridge_core::{BridgeRegistry, ModelRegistry, TransformRegistry};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Shared state threaded through every command handler
///
/// Registries are built fresh for each invocation and hydrated from the
/// configured store and model library; handlers receive the context by
/// reference.
pub struct AppContext {
    pub bridges: Arc<BridgeRegistry>,
    pub transforms: Arc<TransformRegistry>,
    pub models: ModelRegistry,
    pub store: BridgeStore,
    pub library: ModelLibrary,
}

impl AppContext {
    /// Build the context from configuration, hydrating the bridge store
    /// and the model library
    pub fn from_config(config: &Config) -> Result<Self> {
        let bridges = Arc::new(BridgeRegistry::new());
        let transforms = Arc::new(TransformRegistry::with_built_ins());
        let models = ModelRegistry::new();

        let store = BridgeStore::new(&config.paths.store);
        let bridge_count = store.load(&bridges)?;
        debug!("hydrated {} bridge(s) from the store", bridge_count);

        let library = ModelLibrary::new(&config.paths.models_dir);
        let model_count = library.load(&models);
        debug!("hydrated {} model(s) from the library", model_count);

        Ok(Self {
            bridges,
            transforms,
            models,
            store,
            library,
        })
    }
}

/// Parse an inline-JSON-or-@file data argument
///
/// A leading `@` reads the payload from a file, with the format chosen by
/// extension (YAML for .yaml/.yml, JSON otherwise). Anything else is
/// parsed as inline JSON.
pub fn read_data_arg(arg: &str) -> Result<Value> {
    if let Some(raw_path) = arg.strip_prefix('@') {
        let path = Path::new(raw_path);
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s == "yaml" || s == "yml")
            .unwrap_or(false);

        if is_yaml {
            serde_yaml::from_str(&content).map_err(|_e| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "YAML".to_string(),
            })
        } else {
            serde_json::from_str(&content).map_err(|_e| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON".to_string(),
            })
        }
    } else {
        Ok(serde_json::from_str(arg)?)
    }
}

/// Write a payload to a file in the writer's configured format
pub fn save_payload(output: &mut OutputWriter, path: &Path, payload: &Value) -> Result<()> {
    let content = match output.format() {
        OutputFormat::Yaml => serde_yaml::to_string(payload)?,
        _ => serde_json::to_string_pretty(payload)?,
    };

    fs::write(path, content)?;
    output.success(&format!("✓ Output saved to {}", path.display()))?;
    Ok(())
}
