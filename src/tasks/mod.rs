//! The daily task battery.
//!
//! A fixed, statically declared set of named tasks that can run singly or
//! as a batch. Batch runs are sequential in declaration order and never
//! abort: a failing task contributes its `success=false` envelope and the
//! rest still run, so a report always carries exactly as many outcomes as
//! there are declared tasks.

pub mod calendar;
pub mod dress;
pub mod finance;
pub mod fitness;
pub mod food;
pub mod shopping_list;
pub mod stocks;
pub mod weather_brief;

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::envelope::Envelope;
use crate::plugins::weather::SimulatedWeather;

pub use calendar::CalendarTask;
pub use dress::DressTask;
pub use finance::FinanceTask;
pub use fitness::FitnessTask;
pub use food::MealPlanTask;
pub use shopping_list::ShoppingListTask;
pub use stocks::{MarketDataService, SimulatedMarketData, StocksTask};
pub use weather_brief::WeatherBriefTask;

/// One named task in the battery.
///
/// `run` is infallible at the type level; anything that goes wrong inside
/// a task must come back as a failure envelope.
#[async_trait]
pub trait DailyTask: Send + Sync {
    /// Key the task's outcome is reported under.
    fn name(&self) -> &'static str;

    /// Human-readable menu label.
    fn label(&self) -> &'static str;

    async fn run(&self) -> Envelope;
}

#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub name: &'static str,
    pub label: &'static str,
    pub envelope: Envelope,
}

/// Aggregated outcomes of a batch run, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TaskReport {
    pub outcomes: Vec<TaskOutcome>,
}

impl TaskReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn completed(&self) -> Vec<&TaskOutcome> {
        self.outcomes.iter().filter(|o| o.envelope.success).collect()
    }

    pub fn failed(&self) -> Vec<&TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.envelope.success).collect()
    }
}

#[derive(Default)]
pub struct TaskOrchestrator {
    tasks: Vec<Arc<dyn DailyTask>>,
}

impl TaskOrchestrator {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// The standard battery, wired to simulated services.
    pub fn with_defaults(config: &Config) -> Self {
        let prefs = &config.preferences;
        let weather = Arc::new(SimulatedWeather::new());

        let mut orchestrator = Self::new();
        let defaults: Vec<Arc<dyn DailyTask>> = vec![
            Arc::new(MealPlanTask::new(prefs.cuisines.clone())),
            Arc::new(DressTask::new(
                weather.clone(),
                prefs.location.clone(),
                prefs.style_tags.clone(),
            )),
            Arc::new(StocksTask::new(Arc::new(SimulatedMarketData::new()))),
            Arc::new(WeatherBriefTask::new(weather, prefs.location.clone())),
            Arc::new(CalendarTask::new()),
            Arc::new(ShoppingListTask::new(prefs.budget_max)),
            Arc::new(FitnessTask::new(prefs.daily_step_goal)),
            Arc::new(FinanceTask::new(prefs.budget_min, prefs.budget_max)),
        ];
        for task in defaults {
            orchestrator
                .declare(task)
                .expect("default task names are unique");
        }
        orchestrator
    }

    /// Adds a task at the end of the battery. Names must be unique; the
    /// report is keyed by them.
    pub fn declare(&mut self, task: Arc<dyn DailyTask>) -> Result<()> {
        if self.tasks.iter().any(|t| t.name() == task.name()) {
            bail!("task '{}' is already declared", task.name());
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Arc<dyn DailyTask>> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs a single task by name.
    pub async fn run(&self, name: &str) -> Option<TaskOutcome> {
        let task = self.tasks.iter().find(|t| t.name() == name)?;
        info!("Running task: {}", task.name());
        Some(TaskOutcome {
            name: task.name(),
            label: task.label(),
            envelope: task.run().await,
        })
    }

    /// Runs every declared task, sequentially, in declaration order.
    /// Partial-failure semantics: report, don't propagate.
    pub async fn run_all(&self) -> TaskReport {
        let mut report = TaskReport::default();
        for task in &self.tasks {
            info!("Running task: {}", task.name());
            let envelope = task.run().await;
            if !envelope.success {
                info!("Task '{}' reported failure: {}", task.name(), envelope.message);
            }
            report.outcomes.push(TaskOutcome {
                name: task.name(),
                label: task.label(),
                envelope,
            });
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTask {
        name: &'static str,
        success: bool,
    }

    #[async_trait]
    impl DailyTask for FixedTask {
        fn name(&self) -> &'static str {
            self.name
        }
        fn label(&self) -> &'static str {
            "Fixed"
        }
        async fn run(&self) -> Envelope {
            if self.success {
                Envelope::ok("done")
            } else {
                Envelope::fail("broken")
            }
        }
    }

    #[tokio::test]
    async fn run_all_reports_every_task_despite_failures() {
        let mut orchestrator = TaskOrchestrator::new();
        orchestrator
            .declare(Arc::new(FixedTask { name: "a", success: true }))
            .unwrap();
        orchestrator
            .declare(Arc::new(FixedTask { name: "b", success: false }))
            .unwrap();
        orchestrator
            .declare(Arc::new(FixedTask { name: "c", success: true }))
            .unwrap();

        let report = orchestrator.run_all().await;
        assert_eq!(report.len(), 3);
        assert_eq!(report.task_order(), vec!["a", "b", "c"]);
        assert_eq!(report.completed().len(), 2);
        assert_eq!(report.failed().len(), 1);
        assert!(!report.get("b").unwrap().envelope.success);
    }

    #[test]
    fn duplicate_task_names_are_rejected() {
        let mut orchestrator = TaskOrchestrator::new();
        orchestrator
            .declare(Arc::new(FixedTask { name: "a", success: true }))
            .unwrap();
        assert!(orchestrator
            .declare(Arc::new(FixedTask { name: "a", success: true }))
            .is_err());
    }

    #[tokio::test]
    async fn unknown_task_name_is_none() {
        let orchestrator = TaskOrchestrator::new();
        assert!(orchestrator.run("nope").await.is_none());
    }

    #[tokio::test]
    async fn default_battery_declares_eight_tasks() {
        let orchestrator = TaskOrchestrator::with_defaults(&Config::default());
        assert_eq!(orchestrator.len(), 8);
        assert_eq!(
            orchestrator.task_names(),
            vec![
                "food", "dress", "stocks", "weather", "calendar", "shopping", "fitness",
                "finance"
            ]
        );
    }

    impl TaskReport {
        fn task_order(&self) -> Vec<&'static str> {
            self.outcomes.iter().map(|o| o.name).collect()
        }
    }
}
