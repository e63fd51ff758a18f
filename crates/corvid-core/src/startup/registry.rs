use std::collections::HashMap;
use std::fmt;

use crate::kernel::error::{Error, Result};
use crate::startup::error::StageError;
use crate::startup::{StageContext, StartupStage};

/// Registry for the startup stages, keyed by stage id
pub struct StageRegistry {
    stages: HashMap<String, Box<dyn StartupStage>>,
}

// Manual Debug implementation: Box<dyn StartupStage> is not Debug
impl fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage_ids: Vec<&String> = self.stages.keys().collect();
        f.debug_struct("StageRegistry")
            .field("stages", &stage_ids)
            .finish()
    }
}

impl StageRegistry {
    /// Create a new empty stage registry
    pub fn new() -> Self {
        Self {
            stages: HashMap::new(),
        }
    }

    /// Register a stage
    pub fn register_stage(&mut self, stage: Box<dyn StartupStage>) -> Result<()> {
        let id = stage.id().to_string();

        if self.stages.contains_key(&id) {
            return Err(Error::from(StageError::StageAlreadyExists { stage_id: id }));
        }

        self.stages.insert(id, stage);
        Ok(())
    }

    /// Check if a stage with the given ID exists
    pub fn has_stage(&self, id: &str) -> bool {
        self.stages.contains_key(id)
    }

    /// Get the number of registered stages
    pub fn count(&self) -> usize {
        self.stages.len()
    }

    /// Execute a specific stage asynchronously
    pub async fn execute_stage(&self, id: &str, context: &mut StageContext) -> Result<()> {
        let stage = self
            .stages
            .get(id)
            .ok_or_else(|| Error::from(StageError::StageNotFound { stage_id: id.to_string() }))?;

        log::info!("Executing startup stage: {} ({})", stage.name(), id);

        match stage.execute(context).await {
            Ok(()) => {
                log::debug!("Startup stage completed: {}", id);
                Ok(())
            }
            Err(source) => {
                log::error!("Startup stage failed: {} - {}", id, source);
                Err(Error::from(StageError::StageFailed {
                    stage_id: id.to_string(),
                    source: Box::new(source),
                }))
            }
        }
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
