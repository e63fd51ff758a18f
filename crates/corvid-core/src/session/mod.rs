//! # Corvid Core Shared Session
//!
//! At-most-once shared resource cache. [`OnceResource`] guarantees a single
//! construction of a shared value under concurrent first access and supports
//! explicit release; [`HttpSessionCache`] instantiates it for the bot-wide
//! HTTP client session.

pub mod error;

use std::future::Future;

use tokio::sync::OnceCell;

use crate::session::error::SessionError;

/// Lazily created shared resource, constructed at most once for the owner's
/// lifetime.
///
/// Concurrent first calls race on the inner cell: exactly one initializer
/// runs, every caller receives a clone of the single stored value. After
/// [`close`](OnceResource::close) the resource can never be re-created, which
/// keeps the at-most-one-instance guarantee across the whole lifetime.
#[derive(Debug)]
pub struct OnceResource<T> {
    cell: OnceCell<T>,
    closed: bool,
}

impl<T> OnceResource<T> {
    /// Create a new empty resource cache
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            closed: false,
        }
    }

    /// Whether the resource has been created
    pub fn is_created(&self) -> bool {
        self.cell.initialized()
    }

    /// Release the resource if it was created. The cache is unusable
    /// afterwards.
    pub fn close(&mut self) -> Option<T> {
        self.closed = true;
        self.cell.take()
    }
}

impl<T: Clone> OnceResource<T> {
    /// Get the cached value, constructing it with `init` on first call.
    pub async fn get_or_try_create<F, Fut>(&self, init: F) -> Result<T, SessionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SessionError>>,
    {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.cell.get_or_try_init(init).await.cloned()
    }
}

impl<T> Default for OnceResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bot-wide HTTP client session, created lazily on first access.
///
/// `reqwest::Client` clones share one underlying connection pool, so handing
/// out clones preserves the single-session semantics.
#[derive(Debug)]
pub struct HttpSessionCache {
    inner: OnceResource<reqwest::Client>,
}

impl HttpSessionCache {
    /// Create a new empty session cache
    pub fn new() -> Self {
        Self {
            inner: OnceResource::new(),
        }
    }

    /// Get the shared HTTP session, building it on first call.
    pub async fn acquire(&self) -> Result<reqwest::Client, SessionError> {
        self.inner
            .get_or_try_create(|| async {
                log::debug!("Creating shared HTTP session");
                reqwest::Client::builder()
                    .build()
                    .map_err(|source| SessionError::Build { source })
            })
            .await
    }

    /// Whether the session has been created
    pub fn is_created(&self) -> bool {
        self.inner.is_created()
    }

    /// Release the session. Dropping the last client handle closes the
    /// underlying connection pool.
    pub fn close(&mut self) {
        if self.inner.close().is_some() {
            log::debug!("Shared HTTP session released");
        }
    }
}

impl Default for HttpSessionCache {
    fn default() -> Self {
        Self::new()
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
