use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::runtime::Handle;

use crate::config::ConfigMap;
use crate::kernel::bootstrap::Bot;
use crate::kernel::component::{
    BotComponents, EvaluatorFactory, ExchangeFactory, InterfaceFactory, LoopWatcher, TaskScheduler,
    TentacleInitializer,
};
use crate::kernel::constants::{
    CONFIG_EVALUATOR, CONFIG_TRADING_TENTACLES, LONG_VERSION, PROJECT_NAME,
};
use crate::kernel::error::{Error, Result};
use crate::kernel::state::LifecycleState;
use crate::notify::error::NotifyError;
use crate::notify::{Emphasis, Notification, Notifier};
use crate::startup::stages::EVALUATOR_PRELOAD_STAGE;
use crate::startup::StageContext;

type CallLog = Arc<Mutex<Vec<String>>>;

fn record(calls: &CallLog, name: &str) {
    calls.lock().unwrap().push(name.to_string());
}

fn collaborator_error(name: &'static str) -> Error {
    Error::Collaborator {
        collaborator: name,
        message: "stand-in failure".to_string(),
    }
}

#[derive(Debug)]
struct StubInitializer {
    calls: CallLog,
    populate_sections: bool,
}

#[async_trait]
impl TentacleInitializer for StubInitializer {
    async fn create(&self, context: &mut StageContext) -> Result<()> {
        record(&self.calls, "initializer.create");
        if self.populate_sections {
            let config = context.config();
            let mut live = config.write().await;
            live.set(CONFIG_EVALUATOR, json!({"rsi": {"enabled": true}}))?;
            live.set(CONFIG_TRADING_TENTACLES, json!(["dca_trading"]))?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct StubScheduler {
    calls: CallLog,
    handle: Mutex<Option<Handle>>,
    watcher: Mutex<Option<Arc<dyn LoopWatcher>>>,
}

impl StubScheduler {
    fn new(calls: CallLog) -> Self {
        Self {
            calls,
            handle: Mutex::new(None),
            watcher: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TaskScheduler for StubScheduler {
    fn init_loop(&self) -> Result<()> {
        record(&self.calls, "scheduler.init_loop");
        *self.handle.lock().unwrap() = Some(Handle::current());
        Ok(())
    }

    fn main_loop(&self) -> Result<Handle> {
        self.handle
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Lifecycle {
                state: "constructed".to_string(),
                message: "scheduler loop not established".to_string(),
            })
    }

    async fn start_tools_tasks(&self, _context: &mut StageContext) -> Result<()> {
        record(&self.calls, "scheduler.start_tools_tasks");
        Ok(())
    }

    fn set_watcher(&self, watcher: Arc<dyn LoopWatcher>) {
        *self.watcher.lock().unwrap() = Some(watcher);
    }
}

#[derive(Debug)]
struct StubExchangeFactory {
    calls: CallLog,
}

#[async_trait]
impl ExchangeFactory for StubExchangeFactory {
    async fn create(&self, _context: &mut StageContext) -> Result<()> {
        record(&self.calls, "exchange_factory.create");
        Ok(())
    }
}

#[derive(Debug)]
struct StubEvaluatorFactory {
    calls: CallLog,
    fail_initialize: bool,
}

#[async_trait]
impl EvaluatorFactory for StubEvaluatorFactory {
    async fn initialize(&self, _context: &mut StageContext) -> Result<()> {
        record(&self.calls, "evaluator_factory.initialize");
        if self.fail_initialize {
            return Err(collaborator_error("evaluator_factory"));
        }
        Ok(())
    }

    async fn create(&self, _context: &mut StageContext) -> Result<()> {
        record(&self.calls, "evaluator_factory.create");
        Ok(())
    }
}

#[derive(Debug)]
struct StubInterfaceFactory {
    calls: CallLog,
}

#[async_trait]
impl InterfaceFactory for StubInterfaceFactory {
    async fn create(&self, _context: &mut StageContext) -> Result<()> {
        record(&self.calls, "interface_factory.create");
        Ok(())
    }

    async fn start_interfaces(&self, _context: &mut StageContext) -> Result<()> {
        record(&self.calls, "interface_factory.start_interfaces");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StubNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

#[async_trait]
impl Notifier for StubNotifier {
    async fn send(&self, notification: Notification) -> std::result::Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::DeliveryFailed("transport down".to_string()));
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

#[derive(Debug)]
struct StubWatcher;

impl LoopWatcher for StubWatcher {
    fn on_task_error(&self, _error: &Error) {}
}

struct Harness {
    calls: CallLog,
    scheduler: Arc<StubScheduler>,
    notifier: Arc<StubNotifier>,
    components: BotComponents,
}

fn build_harness(populate_sections: bool, fail_evaluator_preload: bool, notifier_fails: bool) -> Harness {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let scheduler = Arc::new(StubScheduler::new(calls.clone()));
    let notifier = Arc::new(StubNotifier {
        sent: Mutex::new(Vec::new()),
        fail: notifier_fails,
    });
    let components = BotComponents {
        initializer: Arc::new(StubInitializer {
            calls: calls.clone(),
            populate_sections,
        }),
        scheduler: scheduler.clone(),
        exchange_factory: Arc::new(StubExchangeFactory { calls: calls.clone() }),
        evaluator_factory: Arc::new(StubEvaluatorFactory {
            calls: calls.clone(),
            fail_initialize: fail_evaluator_preload,
        }),
        interface_factory: Arc::new(StubInterfaceFactory { calls: calls.clone() }),
        notifier: notifier.clone(),
    };
    Harness {
        calls,
        scheduler,
        notifier,
        components,
    }
}

fn sample_config() -> ConfigMap {
    let mut config = ConfigMap::new();
    config.set("exchanges", json!({"binance": {"enabled": true}})).unwrap();
    config.set("trading", json!({"risk": 0.5})).unwrap();
    config
}

#[tokio::test]
async fn test_new_bot_is_constructed_with_matching_snapshots() {
    let harness = build_harness(true, false, false);
    let config = sample_config();
    let bot = Bot::new(config.clone(), false, false, harness.components).unwrap();

    assert!(!bot.is_initialized());
    assert_eq!(bot.state(), &LifecycleState::Constructed);
    assert_eq!(bot.startup_config(), &config);
    assert_eq!(bot.edited_config(), &config);
    assert_eq!(bot.snapshot_version(), 1);
    assert!(harness.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_snapshots_do_not_follow_live_config_mutation() {
    let harness = build_harness(true, false, false);
    let bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    {
        let config = bot.config();
        let mut live = config.write().await;
        live.set("trading", json!({"risk": 0.9})).unwrap();
    }

    assert_eq!(bot.startup_config().section("trading").unwrap()["risk"], json!(0.5));
    assert_eq!(bot.edited_config().section("trading").unwrap()["risk"], json!(0.5));
}

#[tokio::test]
async fn test_instances_are_independent() {
    let config = sample_config();
    let bot_a = Bot::new(
        config.clone(),
        false,
        false,
        build_harness(true, false, false).components,
    )
    .unwrap();
    let bot_b = Bot::new(
        config.clone(),
        false,
        false,
        build_harness(true, false, false).components,
    )
    .unwrap();

    {
        let config_a = bot_a.config();
        let mut live_a = config_a.write().await;
        live_a.set("trading", json!({"risk": 1.0})).unwrap();
    }

    let config_b = bot_b.config();
    let live_b = config_b.read().await;
    assert_eq!(live_b.section("trading").unwrap()["risk"], json!(0.5));
    assert_eq!(bot_b.startup_config(), &config);
    assert_eq!(bot_b.edited_config(), &config);
}

#[tokio::test]
async fn test_initialize_runs_stages_in_required_order() {
    let harness = build_harness(true, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    bot.initialize().await.unwrap();

    let calls = harness.calls.lock().unwrap().clone();
    let calls: Vec<&str> = calls.iter().map(|c| c.as_str()).collect();
    assert_eq!(
        calls,
        vec![
            "initializer.create",
            "scheduler.init_loop",
            "scheduler.start_tools_tasks",
            "evaluator_factory.initialize",
            "exchange_factory.create",
            "evaluator_factory.create",
            "interface_factory.create",
            "interface_factory.start_interfaces",
        ]
    );
    assert!(bot.is_initialized());
    assert_eq!(bot.state(), &LifecycleState::Ready);
}

#[tokio::test]
async fn test_stage_failure_short_circuits_pipeline() {
    let harness = build_harness(true, true, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    let result = bot.initialize().await;
    assert!(result.is_err());
    assert!(!bot.is_initialized());

    match bot.state() {
        LifecycleState::Failed { stage, .. } => assert_eq!(stage, EVALUATOR_PRELOAD_STAGE),
        other => panic!("Expected Failed state, got {:?}", other),
    }

    let calls = harness.calls.lock().unwrap().clone();
    assert_eq!(*calls.last().unwrap(), "evaluator_factory.initialize");
    assert!(!calls.iter().any(|c| c == "exchange_factory.create"));
    assert!(!calls.iter().any(|c| c == "evaluator_factory.create"));
    assert!(!calls.iter().any(|c| c == "interface_factory.create"));
    assert!(!calls.iter().any(|c| c == "interface_factory.start_interfaces"));
}

#[tokio::test]
async fn test_post_init_resnapshot_picks_up_pipeline_sections() {
    let harness = build_harness(true, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    assert!(!bot.startup_config().contains_key(CONFIG_EVALUATOR));

    bot.initialize().await.unwrap();

    assert_eq!(
        bot.startup_config().section(CONFIG_EVALUATOR).unwrap()["rsi"]["enabled"],
        json!(true)
    );
    assert_eq!(
        bot.edited_config().section(CONFIG_TRADING_TENTACLES).unwrap(),
        &json!(["dca_trading"])
    );
    assert_eq!(bot.snapshot_version(), 2);
}

#[tokio::test]
async fn test_missing_pipeline_section_fails_finalization() {
    // Initializer never populates the evaluator sections
    let harness = build_harness(false, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    let result = bot.initialize().await;
    assert!(matches!(result, Err(Error::Config(_))));
    assert!(!bot.is_initialized());
    assert!(bot.state().is_failed());
}

#[tokio::test]
async fn test_initialize_is_single_shot() {
    let harness = build_harness(true, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    bot.initialize().await.unwrap();
    let second = bot.initialize().await;
    assert!(matches!(second, Err(Error::Lifecycle { .. })));
    // The failed re-entry left the bot ready
    assert!(bot.is_initialized());
}

#[tokio::test]
async fn test_initialized_survives_shutdown() {
    let harness = build_harness(true, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    bot.initialize().await.unwrap();
    bot.shutdown();
    assert!(bot.is_initialized());
}

#[tokio::test]
async fn test_startup_notification_content() {
    let harness = build_harness(true, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    bot.initialize().await.unwrap();

    let sent = harness.notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].text(),
        format!("{} {} is starting ...", PROJECT_NAME, LONG_VERSION)
    );
    assert_eq!(sent[0].emphasis(), Emphasis::Italic);
    assert_eq!(bot.notification_failures(), 0);
}

#[tokio::test]
async fn test_notification_failure_does_not_abort_startup() {
    let harness = build_harness(true, false, true);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    bot.initialize().await.unwrap();

    assert!(bot.is_initialized());
    assert_eq!(bot.notification_failures(), 1);
}

#[tokio::test]
async fn test_run_in_main_loop_returns_task_result() {
    let harness = build_harness(true, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    // Before the scheduler loop exists, submission fails
    assert!(bot.run_in_main_loop(async { 0 }).is_err());

    bot.initialize().await.unwrap();

    let handle = bot.run_in_main_loop(async { 41 + 1 }).unwrap();
    assert_eq!(handle.await.unwrap(), 42);
}

#[tokio::test]
async fn test_set_watcher_last_set_wins() {
    let harness = build_harness(true, false, false);
    let bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    let first: Arc<dyn LoopWatcher> = Arc::new(StubWatcher);
    let second: Arc<dyn LoopWatcher> = Arc::new(StubWatcher);

    bot.set_watcher(first.clone());
    bot.set_watcher(second.clone());

    let held = harness.scheduler.watcher.lock().unwrap().clone().unwrap();
    assert!(Arc::ptr_eq(&held, &second));
    assert!(!Arc::ptr_eq(&held, &first));
}

#[tokio::test]
async fn test_http_session_accessor_after_shutdown_fails() {
    let harness = build_harness(true, false, false);
    let mut bot = Bot::new(sample_config(), false, false, harness.components).unwrap();

    let session = bot.http_session().await.unwrap();
    drop(session);

    bot.shutdown();
    assert!(bot.http_session().await.is_err());
}
