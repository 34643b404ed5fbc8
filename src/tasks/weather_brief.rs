//! Morning weather brief.

use std::sync::Arc;

use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::plugins::weather::WeatherService;
use crate::tasks::DailyTask;

pub struct WeatherBriefTask {
    service: Arc<dyn WeatherService>,
    location: String,
}

impl WeatherBriefTask {
    pub fn new(service: Arc<dyn WeatherService>, location: String) -> Self {
        Self { service, location }
    }
}

#[async_trait]
impl DailyTask for WeatherBriefTask {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn label(&self) -> &'static str {
        "Weather Updates"
    }

    async fn run(&self) -> Envelope {
        let current = match self.service.current(&self.location).await {
            Ok(observation) => observation,
            Err(error) => {
                return Envelope::fail(format!("Weather service unavailable: {}", error));
            }
        };

        let mut envelope = Envelope::ok(format!(
            "{}: {}\u{b0}C, {} (humidity {}%)",
            current.location, current.temperature_c, current.condition, current.humidity
        ))
        .with("temperature_c", current.temperature_c)
        .with("condition", current.condition);

        // Forecast is best-effort garnish on top of current conditions.
        if let Ok(days) = self.service.forecast(&self.location, 3).await {
            let outlook: Vec<String> = days
                .iter()
                .map(|d| format!("{} {}/{}\u{b0}C {}", d.day, d.high_c, d.low_c, d.condition))
                .collect();
            if !outlook.is_empty() {
                envelope = envelope.with("outlook", outlook);
            }
        }

        envelope
    }
}
