use std::fmt;

/// Lifecycle state of the orchestrator.
///
/// Transitions are strictly forward: `Constructed` ->
/// `Initializing` (once per stage) -> `Ready`, or `Failed` at whichever stage
/// raised. `Ready` is terminal on the happy path and never reverts; shutdown
/// does not reset it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    /// Built, startup not yet attempted
    Constructed,
    /// Startup pipeline running the given stage
    Initializing { index: usize, stage: String },
    /// Startup completed, the bot answers in APIs
    Ready,
    /// Startup aborted at the given stage
    Failed {
        index: usize,
        stage: String,
        cause: String,
    },
}

impl LifecycleState {
    /// Whether startup completed successfully
    pub fn is_ready(&self) -> bool {
        matches!(self, LifecycleState::Ready)
    }

    /// Whether startup was aborted
    pub fn is_failed(&self) -> bool {
        matches!(self, LifecycleState::Failed { .. })
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Constructed => write!(f, "constructed"),
            LifecycleState::Initializing { index, stage } => {
                write!(f, "initializing (stage {}: {})", index, stage)
            }
            LifecycleState::Ready => write!(f, "ready"),
            LifecycleState::Failed { index, stage, cause } => {
                write!(f, "failed (stage {}: {}): {}", index, stage, cause)
            }
        }
    }
}
