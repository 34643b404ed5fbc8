//! Step-goal progress and a workout suggestion.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::envelope::Envelope;
use crate::tasks::DailyTask;

const WORKOUTS: &[(&str, u32, u32)] = &[
    ("Morning Run", 30, 300),
    ("HIIT Training", 20, 250),
    ("Cycling", 45, 400),
    ("Core Training", 30, 120),
    ("Yoga Session", 60, 150),
];

pub struct FitnessTask {
    step_goal: u32,
}

impl FitnessTask {
    pub fn new(step_goal: u32) -> Self {
        Self { step_goal }
    }

    fn progress_message(&self, steps: u32) -> String {
        let percent = if self.step_goal == 0 {
            100
        } else {
            steps * 100 / self.step_goal
        };
        if steps >= self.step_goal {
            format!("Goal hit: {} steps ({}% of {})", steps, percent, self.step_goal)
        } else {
            format!(
                "{} steps so far ({}% of {}), {} to go",
                steps,
                percent,
                self.step_goal,
                self.step_goal - steps
            )
        }
    }
}

#[async_trait]
impl DailyTask for FitnessTask {
    fn name(&self) -> &'static str {
        "fitness"
    }

    fn label(&self) -> &'static str {
        "Fitness Tracking"
    }

    async fn run(&self) -> Envelope {
        // Simulated tracker reading; the step count is the documented
        // non-deterministic field here.
        let steps = rand::thread_rng().gen_range(4_000..14_000);
        let (workout, minutes, calories) = *WORKOUTS
            .choose(&mut rand::thread_rng())
            .expect("workout table is non-empty");

        Envelope::ok(format!(
            "{}. Suggested workout: {} ({} min, ~{} kcal)",
            self.progress_message(steps),
            workout,
            minutes,
            calories
        ))
        .with("steps", steps)
        .with("step_goal", self.step_goal)
        .with("workout", workout)
    }
}
