//! # Corvid Core Kernel Errors
//!
//! The top-level error type of the crate. Subsystem errors (configuration,
//! startup stages, shared session, notifications) convert into [`Error`]
//! through `#[from]`; lifecycle misuse of the orchestrator itself is reported
//! through [`Error::Lifecycle`].
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::notify::error::NotifyError;
use crate::session::error::SessionError;
use crate::startup::error::StageError;

/// Top-level error type for the orchestration core
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration or snapshot error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Startup stage plan or execution error
    #[error("Startup stage error: {0}")]
    Stage(#[from] StageError),

    /// Shared session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Notification transport error
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Orchestrator used from an invalid lifecycle state
    #[error("Lifecycle error in state '{state}': {message}")]
    Lifecycle { state: String, message: String },

    /// Error raised inside an external collaborator
    #[error("Collaborator '{collaborator}' error: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
