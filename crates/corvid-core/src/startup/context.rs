use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigMap;

/// Context handed to startup stages during execution.
///
/// Carries the live configuration (shared with the orchestrator, so stages
/// mutate it in place), the construction-time flags, and an untyped
/// shared-data map for hand-off between stages.
pub struct StageContext {
    /// Live bot configuration, written by collaborators during startup
    config: Arc<RwLock<ConfigMap>>,

    /// Skip the persisted exchange/tentacle configuration when creating connectivity
    ignore_config: bool,

    /// Wipe historical trading data before exchange setup
    reset_trading_history: bool,

    /// Shared data between stages
    shared_data: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
}

impl StageContext {
    /// Create a new context over the live configuration
    pub fn new(
        config: Arc<RwLock<ConfigMap>>,
        ignore_config: bool,
        reset_trading_history: bool,
    ) -> Self {
        Self {
            config,
            ignore_config,
            reset_trading_history,
            shared_data: HashMap::new(),
        }
    }

    /// Shared handle to the live configuration
    pub fn config(&self) -> Arc<RwLock<ConfigMap>> {
        self.config.clone()
    }

    /// Whether persisted configuration should be ignored
    pub fn ignore_config(&self) -> bool {
        self.ignore_config
    }

    /// Whether historical trading data should be reset
    pub fn reset_trading_history(&self) -> bool {
        self.reset_trading_history
    }

    /// Set a shared data value
    pub fn set_data<T: 'static + Send + Sync>(&mut self, key: &str, value: T) {
        self.shared_data.insert(key.to_string(), Box::new(value));
    }

    /// Get a shared data value
    pub fn get_data<T: 'static + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.shared_data.get(key).and_then(|data| data.downcast_ref::<T>())
    }

    /// Get a mutable reference to a shared data value
    pub fn get_data_mut<T: 'static + Send + Sync>(&mut self, key: &str) -> Option<&mut T> {
        self.shared_data.get_mut(key).and_then(|data| data.downcast_mut::<T>())
    }
}
