//! Model library loading
//!
//! Models live as individual JSON or YAML files in a library directory.
//! The library hydrates a registry at startup, and newly registered
//! model files are copied into the directory so they persist.

use crate::error::{Error, Result};
use graphbridge_core::{Model, ModelRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory of model definition files
pub struct ModelLibrary {
    dir: PathBuf,
}

impl ModelLibrary {
    /// Create a library rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this library reads and writes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every model file in the library into `registry`, returning
    /// the number registered
    ///
    /// A missing directory is an empty library. Files that fail to parse
    /// or register are skipped with a warning.
    pub fn load(&self, registry: &ModelRegistry) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => {
                debug!("model library {:?} not found, starting empty", self.dir);
                return 0;
            }
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_model_file(&path) {
                continue;
            }
            match parse_model_file(&path) {
                Ok(model) => {
                    let name = model.name.clone();
                    match registry.register_model(model) {
                        Ok(()) => loaded += 1,
                        Err(e) => warn!("skipping model '{}' from {:?}: {}", name, path, e),
                    }
                }
                Err(e) => warn!("skipping unreadable model file {:?}: {}", path, e),
            }
        }

        debug!("loaded {} model(s) from {:?}", loaded, self.dir);
        loaded
    }

    /// Parse and register one model file, copying it into the library
    ///
    /// With `force` an existing model of the same name is replaced,
    /// otherwise duplicate names are an error. Returns the registered
    /// model's name. The library copy is named after the model, so
    /// re-registering overwrites the previous file.
    pub fn register_file(
        &self,
        file: &Path,
        registry: &ModelRegistry,
        force: bool,
    ) -> Result<String> {
        if !file.exists() {
            return Err(Error::FileNotFound {
                path: file.to_path_buf(),
            });
        }

        let model = parse_model_file(file)?;
        let name = model.name.clone();

        if force {
            registry.replace_model(model)?;
        } else {
            registry.register_model(model)?;
        }

        fs::create_dir_all(&self.dir)?;
        let extension = file
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("json");
        let dest = self.dir.join(format!("{}.{}", name, extension));
        if dest != file {
            fs::copy(file, &dest)?;
        }

        debug!("registered model '{}' into {:?}", name, dest);
        Ok(name)
    }
}

fn is_model_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

fn parse_model_file(path: &Path) -> Result<Model> {
    let content = fs::read_to_string(path)?;
    let model = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(model)
}
