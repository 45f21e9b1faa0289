//! # Engine Configuration
//!
//! ```yaml
//! registry:
//!   conflict_policy: keep_existing
//! migration_analysis: false
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use apiver_registry::RegistryConfig;

/// Error loading an [`EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config {origin}: {source}")]
    YamlParse {
        origin: String,
        source: serde_yaml::Error,
    },
}

/// Settings for registration and construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub registry: RegistryConfig,
    /// Attach a migration analysis to handles whose version is deprecated.
    pub migration_analysis: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            migration_analysis: true,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, "<string>")
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::YamlParse {
            origin: origin.to_string(),
            source,
        })
    }
}
