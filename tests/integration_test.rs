//! End-to-end scenarios through the public library API, using mock mode
//! and deterministic service doubles so nothing touches the network.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use cognet::config::Config;
use cognet::envelope::Envelope;
use cognet::intent::{Classifier, Intent};
use cognet::plugin::{ensure_supported, CommandRequest, Plugin};
use cognet::plugins::weather::{ForecastDay, WeatherObservation, WeatherService};
use cognet::plugins::{self, SimulatedWeather};
use cognet::registry::PluginRegistry;
use cognet::router::CommandRouter;
use cognet::tasks::{
    CalendarTask, DressTask, FinanceTask, FitnessTask, MealPlanTask, ShoppingListTask,
    SimulatedMarketData, StocksTask, TaskOrchestrator, WeatherBriefTask,
};

fn offline_config() -> Config {
    // No credential, no mock assist: the rule-based core on its own.
    Config::default()
}

fn mock_config() -> Config {
    Config {
        use_mock: true,
        ..Config::default()
    }
}

#[tokio::test]
async fn order_pizza_from_swiggy_end_to_end() -> Result<()> {
    let router = CommandRouter::new(&offline_config())?;
    let envelope = router.process("order pizza from swiggy").await;

    assert!(envelope.success);
    assert!(envelope.message.to_lowercase().contains("pizza"));
    assert_eq!(envelope.get_str("platform"), Some("swiggy"));
    assert_eq!(envelope.get_str("plugin_used"), Some("food_ordering"));
    assert!(envelope.get_str("order_id").unwrap().starts_with("SWIGGY_"));
    Ok(())
}

#[tokio::test]
async fn gibberish_is_answered_not_crashed() -> Result<()> {
    let router = CommandRouter::new(&offline_config())?;
    let envelope = router.process("asdkjasd").await;

    assert!(!envelope.success);
    assert!(!envelope.message.is_empty());
    Ok(())
}

#[tokio::test]
async fn gibberish_with_mock_assist_becomes_chat() -> Result<()> {
    let router = CommandRouter::new(&mock_config())?;
    let envelope = router.process("asdkjasd").await;

    assert!(envelope.success);
    assert_eq!(envelope.get_str("action"), Some("chat"));
    Ok(())
}

#[tokio::test]
async fn dispatch_is_idempotent_modulo_confirmation_fields() -> Result<()> {
    let router = CommandRouter::new(&offline_config())?;

    let first = router.process("order pizza from swiggy").await;
    let second = router.process("order pizza from swiggy").await;

    assert_eq!(first.success, second.success);
    assert_eq!(first.get_str("platform"), second.get_str("platform"));
    assert_eq!(first.get_str("item"), second.get_str("item"));
    assert_eq!(first.get("subtotal"), second.get("subtotal"));
    // order_id and eta are the documented non-deterministic fields.
    Ok(())
}

struct ClaimAll {
    name: &'static str,
}

#[async_trait]
impl Plugin for ClaimAll {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "claims the shopping intent"
    }
    fn supported_intents(&self) -> &[Intent] {
        &[Intent::Shopping]
    }
    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;
        Ok(Envelope::ok(format!("{} handled it", self.name)))
    }
}

#[tokio::test]
async fn competing_plugins_resolve_to_the_first_registered() -> Result<()> {
    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(ClaimAll { name: "alpha" }))?;
    registry.register(Arc::new(ClaimAll { name: "beta" }))?;
    let router = CommandRouter::with_parts(Classifier::new(), registry, None);

    for _ in 0..5 {
        let envelope = router.process("buy a red dress from amazon").await;
        assert_eq!(envelope.get_str("plugin_used"), Some("alpha"));
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_plugin_registration_is_rejected() -> Result<()> {
    let mut registry = PluginRegistry::new();
    plugins::install_builtins(&mut registry, &offline_config())?;
    let result = registry.register(Arc::new(ClaimAll { name: "shopping" }));
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn unhandled_intent_returns_no_handler_envelope() -> Result<()> {
    // A registry with no weather plugin.
    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(ClaimAll { name: "alpha" }))?;
    let router = CommandRouter::with_parts(Classifier::new(), registry, None);

    let envelope = router.process("what's the weather like").await;
    assert!(!envelope.success);
    assert_eq!(envelope.get_str("intent"), Some("weather"));
    Ok(())
}

struct OfflineWeather;

#[async_trait]
impl WeatherService for OfflineWeather {
    async fn current(&self, _location: &str) -> Result<WeatherObservation> {
        anyhow::bail!("connection reset by peer")
    }
    async fn forecast(&self, _location: &str, _days: u32) -> Result<Vec<ForecastDay>> {
        anyhow::bail!("connection reset by peer")
    }
}

/// The weather task's external call is stubbed to fail: the report still
/// carries all 8 task keys, with only the weather entry failed.
#[tokio::test]
async fn run_all_reports_eight_outcomes_with_a_dead_weather_service() -> Result<()> {
    let config = offline_config();
    let prefs = &config.preferences;
    let working_weather = Arc::new(SimulatedWeather::new());

    let mut orchestrator = TaskOrchestrator::new();
    orchestrator.declare(Arc::new(MealPlanTask::new(prefs.cuisines.clone())))?;
    orchestrator.declare(Arc::new(DressTask::new(
        working_weather,
        prefs.location.clone(),
        prefs.style_tags.clone(),
    )))?;
    orchestrator.declare(Arc::new(StocksTask::new(Arc::new(SimulatedMarketData::new()))))?;
    orchestrator.declare(Arc::new(WeatherBriefTask::new(
        Arc::new(OfflineWeather),
        prefs.location.clone(),
    )))?;
    orchestrator.declare(Arc::new(CalendarTask::new()))?;
    orchestrator.declare(Arc::new(ShoppingListTask::new(prefs.budget_max)))?;
    orchestrator.declare(Arc::new(FitnessTask::new(prefs.daily_step_goal)))?;
    orchestrator.declare(Arc::new(FinanceTask::new(
        prefs.budget_min,
        prefs.budget_max,
    )))?;

    let report = orchestrator.run_all().await;

    assert_eq!(report.len(), 8);
    let weather = report.get("weather").expect("weather outcome present");
    assert!(!weather.envelope.success);
    assert!(weather.envelope.message.contains("connection reset"));
    for name in ["food", "dress", "stocks", "calendar", "shopping", "fitness", "finance"] {
        let outcome = report.get(name).expect("outcome present");
        assert!(outcome.envelope.success, "task '{}' should succeed", name);
    }
    Ok(())
}

#[tokio::test]
async fn default_battery_runs_clean() -> Result<()> {
    let orchestrator = TaskOrchestrator::with_defaults(&offline_config());
    let report = orchestrator.run_all().await;

    assert_eq!(report.len(), 8);
    assert_eq!(report.failed().len(), 0);
    Ok(())
}

#[tokio::test]
async fn session_style_command_sequence_stays_ordered() -> Result<()> {
    let router = CommandRouter::new(&offline_config())?;

    let commands = [
        "hello",
        "what's the weather like",
        "remind me to stretch in 1 hour",
        "goodbye",
    ];
    let mut actions = Vec::new();
    for command in commands {
        let envelope = router.process(command).await;
        assert!(envelope.success, "'{}' should succeed", command);
        actions.push(envelope.get_str("action").map(str::to_string));
    }

    assert_eq!(actions[0].as_deref(), Some("greeting"));
    assert_eq!(actions[3].as_deref(), Some("goodbye"));
    Ok(())
}
