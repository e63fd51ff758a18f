use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::{ConfigMap, ConfigSnapshots};
use crate::kernel::component::{BotComponents, LoopWatcher};
use crate::kernel::constants::{
    LONG_VERSION, POST_INIT_SNAPSHOT_SECTIONS, PROJECT_NAME, STARTUP_PLAN_NAME,
};
use crate::kernel::error::{Error, Result};
use crate::kernel::state::LifecycleState;
use crate::notify::{BestEffortNotifier, Emphasis, Notification};
use crate::session::HttpSessionCache;
use crate::startup::registry::StageRegistry;
use crate::startup::stages::{
    BackgroundToolsStage, EvaluatorBuildStage, EvaluatorPreloadStage, ExchangeSetupStage,
    InterfaceBuildStage, InterfaceStartStage, SchedulerLoopStage, TentacleConfigStage,
    BACKGROUND_TOOLS_STAGE, EVALUATOR_BUILD_STAGE, EVALUATOR_PRELOAD_STAGE, EXCHANGE_SETUP_STAGE,
    INTERFACE_BUILD_STAGE, INTERFACE_START_STAGE, SCHEDULER_LOOP_STAGE, TENTACLE_CONFIG_STAGE,
};
use crate::startup::{StageContext, StagePlan};

// Pseudo-stage label used when post-startup finalization fails
const FINALIZE_STAGE: &str = "startup::finalize";

/// The lifecycle orchestrator: owns the process-wide configuration state,
/// drives the asynchronous startup of the bot's subsystems in dependency
/// order, and hands out lazily created shared resources.
///
/// Construction is synchronous and cheap; all real work happens in
/// [`initialize`](Bot::initialize).
pub struct Bot {
    start_time: Instant,
    /// Live configuration, written by collaborators during startup
    config: Arc<RwLock<ConfigMap>>,
    snapshots: ConfigSnapshots,
    state: LifecycleState,
    ignore_config: bool,
    reset_trading_history: bool,
    components: BotComponents,
    stages: StageRegistry,
    plan: StagePlan,
    session: HttpSessionCache,
    notifier: BestEffortNotifier,
}

impl Bot {
    /// Create a new orchestrator over the given configuration and
    /// collaborators.
    ///
    /// Takes the construction-time config snapshots, registers the startup
    /// stages and validates the stage plan. Performs no I/O; collaborators
    /// are held but not started.
    pub fn new(
        config: ConfigMap,
        ignore_config: bool,
        reset_trading_history: bool,
        components: BotComponents,
    ) -> Result<Self> {
        let snapshots = ConfigSnapshots::capture(&config);

        let mut stages = StageRegistry::new();
        stages.register_stage(Box::new(TentacleConfigStage::new(
            components.initializer.clone(),
        )))?;
        stages.register_stage(Box::new(SchedulerLoopStage::new(
            components.scheduler.clone(),
        )))?;
        stages.register_stage(Box::new(BackgroundToolsStage::new(
            components.scheduler.clone(),
        )))?;
        stages.register_stage(Box::new(EvaluatorPreloadStage::new(
            components.evaluator_factory.clone(),
        )))?;
        stages.register_stage(Box::new(ExchangeSetupStage::new(
            components.exchange_factory.clone(),
        )))?;
        stages.register_stage(Box::new(EvaluatorBuildStage::new(
            components.evaluator_factory.clone(),
        )))?;
        stages.register_stage(Box::new(InterfaceBuildStage::new(
            components.interface_factory.clone(),
        )))?;
        stages.register_stage(Box::new(InterfaceStartStage::new(
            components.interface_factory.clone(),
        )))?;

        let plan = Self::build_startup_plan()?;
        plan.validate(&stages)?;

        let notifier = BestEffortNotifier::new(components.notifier.clone());

        Ok(Self {
            start_time: Instant::now(),
            config: Arc::new(RwLock::new(config)),
            snapshots,
            state: LifecycleState::Constructed,
            ignore_config,
            reset_trading_history,
            components,
            stages,
            plan,
            session: HttpSessionCache::new(),
            notifier,
        })
    }

    /// Build the startup plan. The dependency chain encodes the bot's hard
    /// startup ordering: tentacle configuration first, evaluator preload
    /// before exchange setup, interface startup last.
    fn build_startup_plan() -> Result<StagePlan> {
        let ordered = [
            TENTACLE_CONFIG_STAGE,
            SCHEDULER_LOOP_STAGE,
            BACKGROUND_TOOLS_STAGE,
            EVALUATOR_PRELOAD_STAGE,
            EXCHANGE_SETUP_STAGE,
            EVALUATOR_BUILD_STAGE,
            INTERFACE_BUILD_STAGE,
            INTERFACE_START_STAGE,
        ];

        let mut plan = StagePlan::new(STARTUP_PLAN_NAME);
        for stage_id in ordered {
            plan.add_stage(stage_id);
        }
        for pair in ordered.windows(2) {
            plan.add_dependency(pair[1], pair[0])?;
        }
        Ok(plan)
    }

    /// Run the startup pipeline.
    ///
    /// Stages execute strictly sequentially in the plan's topological order;
    /// each is fully awaited before the next starts. The first failure aborts
    /// the pipeline, records the failed stage in the lifecycle state and
    /// propagates. Resources created by earlier, successful stages are not
    /// rolled back.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.state != LifecycleState::Constructed {
            return Err(Error::Lifecycle {
                state: self.state.to_string(),
                message: "initialize() may only be called once".to_string(),
            });
        }

        log::info!("Starting {} {}", PROJECT_NAME, LONG_VERSION);

        let order = self.plan.execution_order()?;
        let mut context = StageContext::new(
            self.config.clone(),
            self.ignore_config,
            self.reset_trading_history,
        );

        for (index, stage_id) in order.iter().enumerate() {
            self.state = LifecycleState::Initializing {
                index,
                stage: stage_id.clone(),
            };
            if let Err(err) = self.stages.execute_stage(stage_id, &mut context).await {
                self.state = LifecycleState::Failed {
                    index,
                    stage: stage_id.clone(),
                    cause: err.to_string(),
                };
                return Err(err);
            }
        }

        self.post_initialize(order.len()).await
    }

    /// Finalize startup: refresh the config snapshots with the sections
    /// populated during the pipeline, mark the bot ready and announce it.
    async fn post_initialize(&mut self, stage_count: usize) -> Result<()> {
        {
            let live = self.config.read().await;
            if let Err(err) = self.snapshots.resnapshot(&live, POST_INIT_SNAPSHOT_SECTIONS) {
                self.state = LifecycleState::Failed {
                    index: stage_count,
                    stage: FINALIZE_STAGE.to_string(),
                    cause: err.to_string(),
                };
                return Err(Error::from(err));
            }
        }

        self.state = LifecycleState::Ready;
        log::info!("{} {} initialized", PROJECT_NAME, LONG_VERSION);

        // Best effort: a dropped announcement is logged and counted by the
        // notifier, never surfaced to the caller.
        self.notifier
            .send_best_effort(Notification::new(
                format!("{} {} is starting ...", PROJECT_NAME, LONG_VERSION),
                Emphasis::Italic,
            ))
            .await;

        Ok(())
    }

    /// Submit a unit of asynchronous work onto the scheduler's main loop.
    ///
    /// Safe to call from outside the loop's own execution context; only the
    /// submission happens here, the returned handle resolves to the task's
    /// eventual result.
    pub fn run_in_main_loop<F>(&self, future: F) -> Result<JoinHandle<F::Output>>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handle = self.components.scheduler.main_loop()?;
        Ok(handle.spawn(future))
    }

    /// Attach an external observer to the scheduler. Overwrites any previous
    /// watcher unconditionally.
    pub fn set_watcher(&self, watcher: Arc<dyn LoopWatcher>) {
        self.components.scheduler.set_watcher(watcher);
    }

    /// Get the shared HTTP session, creating it on first call.
    ///
    /// Exactly one session exists for the orchestrator's lifetime regardless
    /// of call count or concurrent first-call races; teardown happens in
    /// [`shutdown`](Bot::shutdown).
    pub async fn http_session(&self) -> Result<reqwest::Client> {
        Ok(self.session.acquire().await?)
    }

    /// Release shared resources. Does not stop collaborators and does not
    /// reset the lifecycle state.
    pub fn shutdown(&mut self) {
        log::info!("Shutting down {} shared resources", PROJECT_NAME);
        self.session.close();
    }

    /// Current lifecycle state
    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// Whether startup completed successfully
    pub fn is_initialized(&self) -> bool {
        self.state.is_ready()
    }

    /// Instant the orchestrator was constructed
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Time elapsed since construction
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Shared handle to the live configuration
    pub fn config(&self) -> Arc<RwLock<ConfigMap>> {
        self.config.clone()
    }

    /// The "as launched" configuration snapshot
    pub fn startup_config(&self) -> &ConfigMap {
        self.snapshots.startup()
    }

    /// The working configuration copy for later user edits
    pub fn edited_config(&self) -> &ConfigMap {
        self.snapshots.edited()
    }

    /// Mutable access to the working configuration copy
    pub fn edited_config_mut(&mut self) -> &mut ConfigMap {
        self.snapshots.edited_mut()
    }

    /// Version of the config snapshots, bumped on every resnapshot
    pub fn snapshot_version(&self) -> u64 {
        self.snapshots.version()
    }

    /// Number of startup notifications dropped by the transport
    pub fn notification_failures(&self) -> u64 {
        self.notifier.failures()
    }

    /// The startup stage plan
    pub fn startup_plan(&self) -> &StagePlan {
        &self.plan
    }
}
