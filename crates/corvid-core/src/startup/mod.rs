//! # Corvid Core Startup Pipeline
//!
//! The startup stage plan: a small dependency graph of named stages the
//! orchestrator executes in topological order during [`Bot::initialize`].
//! Each stage wraps one call into an external collaborator; the ordering
//! encoded here is the bot's hard startup invariant (tentacle configuration
//! before everything else, evaluator preload before exchange setup, interface
//! startup last).
//!
//! [`Bot::initialize`]: crate::kernel::Bot::initialize

pub mod context;
pub mod error;
pub mod plan;
pub mod registry;
pub mod stages;

use async_trait::async_trait;

use crate::kernel::error::Result;

/// Core trait that all startup stages implement
#[async_trait]
pub trait StartupStage: Send + Sync {
    /// The unique identifier of the stage
    fn id(&self) -> &str;

    /// The human-readable name of the stage
    fn name(&self) -> &str;

    /// The description of what this stage does
    fn description(&self) -> &str;

    /// Execute the stage with the given context
    async fn execute(&self, context: &mut context::StageContext) -> Result<()>;
}

// Re-export important types
pub use context::StageContext;
pub use plan::StagePlan;
pub use registry::StageRegistry;
