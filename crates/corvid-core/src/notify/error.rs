//! # Corvid Core Notification Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}
