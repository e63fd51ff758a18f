use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::component::{
    EvaluatorFactory, ExchangeFactory, InterfaceFactory, TaskScheduler, TentacleInitializer,
};
use crate::kernel::error::Result;
use crate::startup::{StageContext, StartupStage};

// Stage identifiers, in required execution order
pub const TENTACLE_CONFIG_STAGE: &str = "startup::tentacle_config";
pub const SCHEDULER_LOOP_STAGE: &str = "startup::scheduler_loop";
pub const BACKGROUND_TOOLS_STAGE: &str = "startup::background_tools";
pub const EVALUATOR_PRELOAD_STAGE: &str = "startup::evaluator_preload";
pub const EXCHANGE_SETUP_STAGE: &str = "startup::exchange_setup";
pub const EVALUATOR_BUILD_STAGE: &str = "startup::evaluator_build";
pub const INTERFACE_BUILD_STAGE: &str = "startup::interface_build";
pub const INTERFACE_START_STAGE: &str = "startup::interface_start";

// --- Startup Stage Definitions ---

/// Loads and merges tentacle configuration into the live config. Runs first:
/// every later stage may read the sections it populates.
#[derive(Debug)]
pub struct TentacleConfigStage {
    initializer: Arc<dyn TentacleInitializer>,
}

impl TentacleConfigStage {
    pub fn new(initializer: Arc<dyn TentacleInitializer>) -> Self {
        Self { initializer }
    }
}

#[async_trait]
impl StartupStage for TentacleConfigStage {
    fn id(&self) -> &str { TENTACLE_CONFIG_STAGE }
    fn name(&self) -> &str { "Tentacle Configuration" }
    fn description(&self) -> &str { "Loads and merges tentacle configuration into the live config." }

    async fn execute(&self, context: &mut StageContext) -> Result<()> {
        self.initializer.create(context).await
    }
}

/// Establishes the main cooperative execution loop all later asynchronous
/// work runs under.
#[derive(Debug)]
pub struct SchedulerLoopStage {
    scheduler: Arc<dyn TaskScheduler>,
}

impl SchedulerLoopStage {
    pub fn new(scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self { scheduler }
    }
}

#[async_trait]
impl StartupStage for SchedulerLoopStage {
    fn id(&self) -> &str { SCHEDULER_LOOP_STAGE }
    fn name(&self) -> &str { "Scheduler Loop" }
    fn description(&self) -> &str { "Establishes the main execution loop of the task scheduler." }

    async fn execute(&self, _context: &mut StageContext) -> Result<()> {
        self.scheduler.init_loop()
    }
}

/// Launches auxiliary long-running tooling tasks (backtesting, optimization).
/// Only their submission is awaited; the tasks keep running alongside the
/// rest of the pipeline.
#[derive(Debug)]
pub struct BackgroundToolsStage {
    scheduler: Arc<dyn TaskScheduler>,
}

impl BackgroundToolsStage {
    pub fn new(scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self { scheduler }
    }
}

#[async_trait]
impl StartupStage for BackgroundToolsStage {
    fn id(&self) -> &str { BACKGROUND_TOOLS_STAGE }
    fn name(&self) -> &str { "Background Tools" }
    fn description(&self) -> &str { "Starts auxiliary long-running tooling tasks." }

    async fn execute(&self, context: &mut StageContext) -> Result<()> {
        self.scheduler.start_tools_tasks(context).await
    }
}

/// Prepares the evaluator registry and metadata. Must complete before
/// exchange setup, which consults evaluator configuration.
#[derive(Debug)]
pub struct EvaluatorPreloadStage {
    evaluator_factory: Arc<dyn EvaluatorFactory>,
}

impl EvaluatorPreloadStage {
    pub fn new(evaluator_factory: Arc<dyn EvaluatorFactory>) -> Self {
        Self { evaluator_factory }
    }
}

#[async_trait]
impl StartupStage for EvaluatorPreloadStage {
    fn id(&self) -> &str { EVALUATOR_PRELOAD_STAGE }
    fn name(&self) -> &str { "Evaluator Preload" }
    fn description(&self) -> &str { "Prepares the evaluator registry and metadata." }

    async fn execute(&self, context: &mut StageContext) -> Result<()> {
        self.evaluator_factory.initialize(context).await
    }
}

/// Establishes exchange connections and market data feeds.
#[derive(Debug)]
pub struct ExchangeSetupStage {
    exchange_factory: Arc<dyn ExchangeFactory>,
}

impl ExchangeSetupStage {
    pub fn new(exchange_factory: Arc<dyn ExchangeFactory>) -> Self {
        Self { exchange_factory }
    }
}

#[async_trait]
impl StartupStage for ExchangeSetupStage {
    fn id(&self) -> &str { EXCHANGE_SETUP_STAGE }
    fn name(&self) -> &str { "Exchange Setup" }
    fn description(&self) -> &str { "Establishes exchange connections and market data feeds." }

    async fn execute(&self, context: &mut StageContext) -> Result<()> {
        self.exchange_factory.create(context).await
    }
}

/// Builds the concrete evaluators now that exchange data is available.
#[derive(Debug)]
pub struct EvaluatorBuildStage {
    evaluator_factory: Arc<dyn EvaluatorFactory>,
}

impl EvaluatorBuildStage {
    pub fn new(evaluator_factory: Arc<dyn EvaluatorFactory>) -> Self {
        Self { evaluator_factory }
    }
}

#[async_trait]
impl StartupStage for EvaluatorBuildStage {
    fn id(&self) -> &str { EVALUATOR_BUILD_STAGE }
    fn name(&self) -> &str { "Evaluator Build" }
    fn description(&self) -> &str { "Builds concrete evaluators from exchange data." }

    async fn execute(&self, context: &mut StageContext) -> Result<()> {
        self.evaluator_factory.create(context).await
    }
}

/// Builds the user-facing interfaces.
#[derive(Debug)]
pub struct InterfaceBuildStage {
    interface_factory: Arc<dyn InterfaceFactory>,
}

impl InterfaceBuildStage {
    pub fn new(interface_factory: Arc<dyn InterfaceFactory>) -> Self {
        Self { interface_factory }
    }
}

#[async_trait]
impl StartupStage for InterfaceBuildStage {
    fn id(&self) -> &str { INTERFACE_BUILD_STAGE }
    fn name(&self) -> &str { "Interface Build" }
    fn description(&self) -> &str { "Builds the user-facing interfaces." }

    async fn execute(&self, context: &mut StageContext) -> Result<()> {
        self.interface_factory.create(context).await
    }
}

/// Starts the user-facing interfaces. Always last: interfaces depend on every
/// backing service built before them.
#[derive(Debug)]
pub struct InterfaceStartStage {
    interface_factory: Arc<dyn InterfaceFactory>,
}

impl InterfaceStartStage {
    pub fn new(interface_factory: Arc<dyn InterfaceFactory>) -> Self {
        Self { interface_factory }
    }
}

#[async_trait]
impl StartupStage for InterfaceStartStage {
    fn id(&self) -> &str { INTERFACE_START_STAGE }
    fn name(&self) -> &str { "Interface Start" }
    fn description(&self) -> &str { "Starts the user-facing interfaces." }

    async fn execute(&self, context: &mut StageContext) -> Result<()> {
        self.interface_factory.start_interfaces(context).await
    }
}
