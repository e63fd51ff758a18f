use std::collections::{HashMap, HashSet};

use crate::kernel::error::{Error, Result};
use crate::startup::error::StageError;
use crate::startup::registry::StageRegistry;

/// Ordered, dependency-aware startup plan.
///
/// Stages are added by id together with their dependency edges; execution
/// order is the topological sort of the resulting graph. The orchestrator
/// builds one plan at construction time and walks it during initialization.
#[derive(Debug, Clone)]
pub struct StagePlan {
    /// Name of the plan
    name: String,
    /// Ordered list of stage IDs included in the plan
    stages: Vec<String>,
    /// Dependencies between stages (stage id -> ids it depends on)
    dependencies: HashMap<String, Vec<String>>,
}

impl StagePlan {
    /// Create a new empty plan
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stages: Vec::new(),
            dependencies: HashMap::new(),
        }
    }

    /// Add a stage ID to the plan
    pub fn add_stage(&mut self, stage_id: &str) {
        if !self.stages.contains(&stage_id.to_string()) {
            self.stages.push(stage_id.to_string());
        }
    }

    /// Add a dependency between stages; both must already be part of the plan
    pub fn add_dependency(&mut self, stage_id: &str, depends_on: &str) -> Result<()> {
        for id in [stage_id, depends_on] {
            if !self.stages.contains(&id.to_string()) {
                return Err(Error::from(StageError::StageNotInPlan {
                    plan_name: self.name.clone(),
                    stage_id: id.to_string(),
                }));
            }
        }

        self.dependencies
            .entry(stage_id.to_string())
            .or_default()
            .push(depends_on.to_string());

        Ok(())
    }

    /// Validate the plan: every stage exists in the registry and the
    /// dependency graph is acyclic.
    pub fn validate(&self, registry: &StageRegistry) -> Result<()> {
        let mut visited = HashSet::new();
        let mut stack = HashSet::new();

        for stage_id in &self.stages {
            if !registry.has_stage(stage_id) {
                return Err(Error::from(StageError::StageNotFound {
                    stage_id: stage_id.clone(),
                }));
            }
            if !visited.contains(stage_id) && self.has_cycle(stage_id, &mut visited, &mut stack) {
                return Err(Error::from(StageError::DependencyCycle {
                    plan_name: self.name.clone(),
                    stage_id: stage_id.clone(),
                }));
            }
        }
        Ok(())
    }

    /// Check for cycles in the dependency graph using DFS (internal helper)
    fn has_cycle(
        &self,
        stage_id: &str,
        visited: &mut HashSet<String>,
        stack: &mut HashSet<String>,
    ) -> bool {
        visited.insert(stage_id.to_string());
        stack.insert(stage_id.to_string());

        if let Some(deps) = self.dependencies.get(stage_id) {
            for dep in deps {
                if !visited.contains(dep) {
                    if self.has_cycle(dep, visited, stack) {
                        return true;
                    }
                } else if stack.contains(dep) {
                    return true;
                }
            }
        }

        stack.remove(stage_id);
        false
    }

    /// Generate a topologically sorted execution order.
    /// Validation (including the cycle check) should happen before calling this.
    pub fn execution_order(&self) -> Result<Vec<String>> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut temp_mark = HashSet::new();

        for stage_id in &self.stages {
            if !visited.contains(stage_id) {
                self.visit_for_topsort(stage_id, &mut visited, &mut temp_mark, &mut result)?;
            }
        }
        Ok(result)
    }

    /// Visit nodes for topological sort (internal helper)
    fn visit_for_topsort(
        &self,
        stage_id: &str,
        visited: &mut HashSet<String>,
        temp_mark: &mut HashSet<String>,
        result: &mut Vec<String>,
    ) -> Result<()> {
        if temp_mark.contains(stage_id) {
            return Err(Error::from(StageError::DependencyCycle {
                plan_name: self.name.clone(),
                stage_id: stage_id.to_string(),
            }));
        }
        if visited.contains(stage_id) {
            return Ok(());
        }

        temp_mark.insert(stage_id.to_string());

        if let Some(deps) = self.dependencies.get(stage_id) {
            for dep in deps {
                self.visit_for_topsort(dep, visited, temp_mark, result)?;
            }
        }

        temp_mark.remove(stage_id);
        visited.insert(stage_id.to_string());
        result.push(stage_id.to_string());

        Ok(())
    }

    /// Get the name of the plan
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the stages in the plan
    pub fn stages(&self) -> &[String] {
        &self.stages
    }
}
