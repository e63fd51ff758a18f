/// Product name
pub const PROJECT_NAME: &str = "Corvid";

/// Full version string, including the release channel
pub const LONG_VERSION: &str = "0.4.0-beta.2";

/// Config section holding evaluator configuration, populated by the tentacle
/// initializer and the evaluator factory
pub const CONFIG_EVALUATOR: &str = "evaluator";

/// Config section holding trading tentacle configuration
pub const CONFIG_TRADING_TENTACLES: &str = "trading-tentacles";

/// Config sections re-snapshotted after startup completes. These are only
/// populated during the startup pipeline, so the construction-time snapshots
/// miss them.
pub const POST_INIT_SNAPSHOT_SECTIONS: &[&str] = &[CONFIG_EVALUATOR, CONFIG_TRADING_TENTACLES];

/// Name of the startup stage plan
pub const STARTUP_PLAN_NAME: &str = "bot_startup";
