//! # Corvid Core Kernel
//!
//! The composition root of the bot. This module owns the fundamental
//! lifecycle operations: constructing the orchestrator, sequencing the
//! asynchronous startup of the external subsystems, and exposing shared
//! resources once the bot is ready.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Orchestration**: [`Bot`](bootstrap::Bot) holds the configuration
//!   state, the startup plan and the collaborator handles, and drives startup
//!   through [`Bot::initialize`](bootstrap::Bot::initialize).
//! - **Collaborator contracts**: the `component` submodule defines the opaque
//!   capabilities the orchestrator consumes (tentacle initializer, task
//!   scheduler, exchange/evaluator/interface factories, notifier, watcher).
//! - **Lifecycle state**: the `state` submodule models startup as an explicit
//!   state machine ([`LifecycleState`](state::LifecycleState)).
//! - **Core Constants**: product identity and fixed config section names in
//!   the `constants` submodule.
//! - **Error Handling**: the crate-wide [`Error`](error::Error) and `Result`
//!   alias in the `error` submodule.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;
pub mod state;

pub use bootstrap::Bot;
pub use component::BotComponents;
pub use error::{Error, Result};
pub use state::LifecycleState;

// Test module declaration
#[cfg(test)]
mod tests;
