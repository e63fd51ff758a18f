//! # Corvid Core Notifications
//!
//! Notification types and the dispatch contract consumed by the orchestrator.
//! Delivery itself happens in an external transport; this module only defines
//! the message shape and the best-effort wrapper used for the startup
//! announcement.

pub mod error;

use std::fmt;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::notify::error::NotifyError;

/// Emphasis style applied to a notification when the transport renders
/// markdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    None,
    Italic,
    Bold,
}

/// A user-facing notification message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    text: String,
    emphasis: Emphasis,
}

impl Notification {
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.emphasis {
            Emphasis::None => write!(f, "{}", self.text),
            Emphasis::Italic => write!(f, "*{}*", self.text),
            Emphasis::Bold => write!(f, "**{}**", self.text),
        }
    }
}

/// Notification dispatch contract, implemented by the external transport
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Best-effort wrapper around a [`Notifier`].
///
/// Delivery failures are swallowed on purpose (a lost announcement must not
/// abort startup) but never silently: each failure is logged and counted.
#[derive(Debug)]
pub struct BestEffortNotifier {
    inner: Arc<dyn Notifier>,
    failures: AtomicU64,
}

impl BestEffortNotifier {
    pub fn new(inner: Arc<dyn Notifier>) -> Self {
        Self {
            inner,
            failures: AtomicU64::new(0),
        }
    }

    /// Send a notification, reporting whether delivery succeeded.
    pub async fn send_best_effort(&self, notification: Notification) -> bool {
        match self.inner.send(notification.clone()).await {
            Ok(()) => true,
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("Notification '{}' dropped: {}", notification.text(), err);
                false
            }
        }
    }

    /// Number of notifications dropped so far
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
