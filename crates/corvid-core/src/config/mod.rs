//! # Corvid Core Configuration
//!
//! In-memory configuration state for the bot. [`ConfigMap`] is the live
//! mutable mapping written by collaborators during startup; [`ConfigSnapshots`]
//! holds the two independent point-in-time copies of it (the "as launched"
//! startup config and the user-editable working copy).

pub mod error;
pub mod snapshot;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

pub use snapshot::ConfigSnapshots;

/// In-memory representation of the bot configuration.
///
/// Values are arbitrary JSON trees keyed by section name. Cloning produces a
/// deep copy, which is what the snapshot machinery relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMap {
    /// Raw configuration values
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

impl ConfigMap {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Create a configuration from a HashMap
    pub fn from_hashmap(values: HashMap<String, serde_json::Value>) -> Self {
        Self { values }
    }

    /// Get a configuration value, deserialized into the requested type
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a configuration value with default
    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Get the raw JSON value of a section
    pub fn section(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Set a configuration value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        let json_value =
            serde_json::to_value(value).map_err(|source| ConfigError::Serialization {
                key: key.to_string(),
                source,
            })?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Remove a configuration value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }

    /// Check if key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get all keys
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Number of top-level sections
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the configuration is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge with another config, overriding existing values
    pub fn merge(&mut self, other: &ConfigMap) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}

impl Default for ConfigMap {
    fn default() -> Self {
        Self::new()
    }
}
