//! # Corvid Core
//!
//! Lifecycle orchestration core for the Corvid trading bot. This crate owns
//! the process-wide configuration state, sequences the asynchronous startup of
//! the bot's subsystems in dependency order, and exposes lazily created shared
//! resources (such as the HTTP session) to the rest of the process.
//!
//! Subsystem internals (tentacle loading, exchange connectivity, evaluators,
//! user interfaces, notification transport) live outside this crate and are
//! consumed through the collaborator contracts in [`kernel::component`].

pub mod config;
pub mod kernel;
pub mod notify;
pub mod session;
pub mod startup;

// Re-export key public types for composition roots and collaborators.
pub use kernel::Bot;
pub use kernel::component::{
    BotComponents, EvaluatorFactory, ExchangeFactory, InterfaceFactory, LoopWatcher,
    TaskScheduler, TentacleInitializer,
};
pub use kernel::error::{Error, Result};
pub use kernel::state::LifecycleState;
pub use config::{ConfigMap, ConfigSnapshots};
pub use notify::{BestEffortNotifier, Emphasis, Notification, Notifier};
pub use startup::{StageContext, StartupStage};
