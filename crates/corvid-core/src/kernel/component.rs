use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;

use crate::kernel::error::{Error, Result};
use crate::notify::Notifier;
use crate::startup::StageContext;

/// Tentacle configuration initializer.
///
/// Loads and merges plugin ("tentacle") configuration into the live config.
/// Runs first during startup: every later stage may read config keys it
/// populates.
#[async_trait]
pub trait TentacleInitializer: Send + Sync + Debug {
    async fn create(&self, context: &mut StageContext) -> Result<()>;
}

/// Cooperative task scheduler.
///
/// Owns the main execution loop all asynchronous bot work runs under, plus
/// the long-running background tooling tasks (backtesting, optimization).
#[async_trait]
pub trait TaskScheduler: Send + Sync + Debug {
    /// Establish the main execution loop. Must be called before
    /// [`main_loop`](TaskScheduler::main_loop) and before any tooling task is
    /// started.
    fn init_loop(&self) -> Result<()>;

    /// Handle of the main execution loop; errors if the loop was not
    /// established yet.
    fn main_loop(&self) -> Result<Handle>;

    /// Launch auxiliary long-running tasks. The tasks keep running past this
    /// call; only their submission is awaited.
    async fn start_tools_tasks(&self, context: &mut StageContext) -> Result<()>;

    /// Attach an external observer. Overwrites unconditionally, last set wins.
    fn set_watcher(&self, watcher: Arc<dyn LoopWatcher>);
}

/// Observer attached to the scheduler, informed of task failures on the main
/// loop. Its lifecycle is managed by whoever attaches it.
pub trait LoopWatcher: Send + Sync + Debug {
    fn on_task_error(&self, error: &Error);
}

/// Exchange connectivity factory: establishes exchange connections and market
/// data feeds.
#[async_trait]
pub trait ExchangeFactory: Send + Sync + Debug {
    async fn create(&self, context: &mut StageContext) -> Result<()>;
}

/// Evaluator factory, driven in two phases: `initialize` prepares the
/// evaluator registry and metadata before exchange connectivity exists,
/// `create` builds the concrete evaluators once exchange data is available.
#[async_trait]
pub trait EvaluatorFactory: Send + Sync + Debug {
    async fn initialize(&self, context: &mut StageContext) -> Result<()>;
    async fn create(&self, context: &mut StageContext) -> Result<()>;
}

/// User-facing interface factory: builds and starts dashboards/APIs once all
/// backing services exist.
#[async_trait]
pub trait InterfaceFactory: Send + Sync + Debug {
    async fn create(&self, context: &mut StageContext) -> Result<()>;
    async fn start_interfaces(&self, context: &mut StageContext) -> Result<()>;
}

/// Bundle of the external collaborators the orchestrator drives.
///
/// Built by the composition root and handed to [`Bot::new`]. Collaborator
/// constructors must not perform I/O; all real work happens inside the
/// startup stages.
///
/// [`Bot::new`]: crate::kernel::Bot::new
#[derive(Debug, Clone)]
pub struct BotComponents {
    pub initializer: Arc<dyn TentacleInitializer>,
    pub scheduler: Arc<dyn TaskScheduler>,
    pub exchange_factory: Arc<dyn ExchangeFactory>,
    pub evaluator_factory: Arc<dyn EvaluatorFactory>,
    pub interface_factory: Arc<dyn InterfaceFactory>,
    pub notifier: Arc<dyn Notifier>,
}
