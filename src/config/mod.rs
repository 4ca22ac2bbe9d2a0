//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::{FilterCriteria, SortCriteria};
use crate::stats::{RatingTiers, RecencyTiers};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which backend holds the records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Volatile, for tests and demos
    #[default]
    InMemory,

    /// Single JSON document on disk
    JsonFile { path: PathBuf },

    /// LMDB environment directory (requires the `lmdb` feature)
    Lmdb { path: PathBuf },
}

/// Filter and sort applied when the caller supplies none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    pub filter: FilterCriteria,
    pub sort: SortCriteria,
}

/// Tier boundaries for summary statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub rating_tiers: RatingTiers,
    pub recency_tiers: RecencyTiers,
}

/// Complete configuration for the location service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub storage: StorageConfig,
    pub query: QueryDefaults,
    pub stats: StatsConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    ///
    /// Tier sets are validated while parsing; the rest by [`Self::validate`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.storage {
            StorageConfig::JsonFile { path } | StorageConfig::Lmdb { path }
                if path.as_os_str().is_empty() =>
            {
                Err(ConfigError::invalid("storage.path", "must not be empty"))
            }
            StorageConfig::Lmdb { .. } if !cfg!(feature = "lmdb") => Err(ConfigError::invalid(
                "storage.backend",
                "lmdb backend requires the `lmdb` feature",
            )),
            _ => Ok(()),
        }
    }
}
