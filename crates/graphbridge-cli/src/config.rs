//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (TOML/JSON/YAML)
//! - Environment variables

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Path settings
    pub paths: PathConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: Option<String>,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Bridge store file, a flat JSON array of bridge records
    pub store: PathBuf,

    /// Directory holding model files (JSON or YAML)
    pub models_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            paths: PathConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: None }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join("graphbridge"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".graphbridge")
            });

        Self {
            store: data_dir.join("bridges.json"),
            models_dir: data_dir.join("models"),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(mut config) => {
                        config.apply_env();
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "configuration file {:?} does not exist",
                    path
                )));
            }
            let mut config = Self::from_file(path)?;
            config.apply_env();
            Ok(config)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        paths.push(PathBuf::from(".graphbridge.toml"));
        paths.push(PathBuf::from(".graphbridge.json"));
        paths.push(PathBuf::from(".graphbridge.yaml"));
        paths.push(PathBuf::from("graphbridge.toml"));

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join("graphbridge");
            paths.push(app_dir.join("config.toml"));
            paths.push(app_dir.join("config.json"));
            paths.push(app_dir.join("config.yaml"));
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".graphbridge.toml"));
        }

        paths
    }

    /// Apply GRAPHBRIDGE_* environment overrides
    fn apply_env(&mut self) {
        if let Ok(store) = std::env::var("GRAPHBRIDGE_STORE") {
            self.paths.store = PathBuf::from(store);
        }
        if let Ok(models_dir) = std::env::var("GRAPHBRIDGE_MODELS_DIR") {
            self.paths.models_dir = PathBuf::from(models_dir);
        }
    }
}
