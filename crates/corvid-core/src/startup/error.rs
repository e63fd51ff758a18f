//! # Corvid Core Startup Errors
//!
//! Defines error types specific to the startup stage plan: registration,
//! dependency resolution and stage execution failures.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("Stage '{stage_id}' not found")]
    StageNotFound { stage_id: String },

    #[error("Stage '{stage_id}' already exists in the registry")]
    StageAlreadyExists { stage_id: String },

    #[error("Stage '{stage_id}' must be added to plan '{plan_name}' before adding a dependency")]
    StageNotInPlan { plan_name: String, stage_id: String },

    #[error("Dependency cycle detected in plan '{plan_name}' starting from stage '{stage_id}'")]
    DependencyCycle { plan_name: String, stage_id: String },

    #[error("Stage execution failed for stage '{stage_id}': {source}")]
    StageFailed {
        stage_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}
