//! # Corvid Core Configuration Errors
//!
//! Defines error types specific to configuration state and snapshotting.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to serialize config value for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config section '{section}' missing from live configuration during snapshot")]
    SectionMissing { section: String },
}
