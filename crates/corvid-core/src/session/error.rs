//! # Corvid Core Session Errors
//!
//! Defines error types specific to the shared resource cache.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to build HTTP session: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },

    #[error("Shared resource cache is closed")]
    Closed,
}
