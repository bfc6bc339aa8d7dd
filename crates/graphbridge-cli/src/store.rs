//! File-backed persistence for the bridge registry
//!
//! Bridges survive process restarts as a flat JSON array on disk. The
//! store hydrates a registry at startup and is rewritten wholesale after
//! every mutation, keeping the file a faithful snapshot of the registry.

use crate::error::Result;
use graphbridge_core::{Bridge, BridgeRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads and writes one bridge store file
pub struct BridgeStore {
    path: PathBuf,
}

impl BridgeStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hydrate `registry` from the store file, returning the number of
    /// bridges registered
    ///
    /// A missing file is an empty store. Records that fail the registry's
    /// structural checks are skipped with a warning; an unparsable file is
    /// an error.
    pub fn load(&self, registry: &BridgeRegistry) -> Result<usize> {
        if !self.path.exists() {
            debug!("bridge store {:?} not found, starting empty", self.path);
            return Ok(0);
        }

        let content = fs::read_to_string(&self.path)?;
        let records: Vec<Bridge> = serde_json::from_str(&content)?;

        let mut loaded = 0;
        for bridge in records {
            let id = bridge.id.clone();
            match registry.register(bridge) {
                Ok(()) => loaded += 1,
                Err(e) => warn!("skipping stored bridge '{}': {}", id, e),
            }
        }

        debug!("loaded {} bridge(s) from {:?}", loaded, self.path);
        Ok(loaded)
    }

    /// Write the registry's current bridges back to the store file
    pub fn save(&self, registry: &BridgeRegistry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bridges = registry.bridges();
        let records: Vec<&Bridge> = bridges.iter().map(|b| b.as_ref()).collect();
        let content = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, content)?;

        debug!("saved {} bridge(s) to {:?}", records.len(), self.path);
        Ok(())
    }
}
