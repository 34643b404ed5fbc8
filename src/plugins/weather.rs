//! Weather lookups.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{ensure_supported, CommandRequest, Plugin};

#[derive(Debug, Clone)]
pub struct WeatherObservation {
    pub location: String,
    pub temperature_c: i32,
    pub condition: String,
    pub humidity: u32,
    pub wind_kmh: u32,
}

#[derive(Debug, Clone)]
pub struct ForecastDay {
    pub day: String,
    pub high_c: i32,
    pub low_c: i32,
    pub condition: String,
}

/// Seam to a weather provider.
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, location: &str) -> Result<WeatherObservation>;

    async fn forecast(&self, location: &str, days: u32) -> Result<Vec<ForecastDay>>;
}

/// Simulated provider drawing from a fixed set of plausible conditions.
pub struct SimulatedWeather;

const CONDITIONS: &[(&str, i32, u32, u32)] = &[
    ("Sunny", 22, 45, 8),
    ("Partly Cloudy", 15, 60, 12),
    ("Rainy", 8, 85, 15),
    ("Clear", 28, 40, 5),
];

impl SimulatedWeather {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedWeather {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherService for SimulatedWeather {
    async fn current(&self, location: &str) -> Result<WeatherObservation> {
        let mut rng = rand::thread_rng();
        let (condition, temperature_c, humidity, wind_kmh) =
            *CONDITIONS.choose(&mut rng).expect("condition table is non-empty");
        Ok(WeatherObservation {
            location: location.to_string(),
            temperature_c,
            condition: condition.to_string(),
            humidity,
            wind_kmh,
        })
    }

    async fn forecast(&self, location: &str, days: u32) -> Result<Vec<ForecastDay>> {
        let _ = location;
        let mut rng = rand::thread_rng();
        let names = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        Ok((0..days as usize)
            .map(|i| {
                let (condition, temp, _, _) =
                    *CONDITIONS.choose(&mut rng).expect("condition table is non-empty");
                ForecastDay {
                    day: names[i % names.len()].to_string(),
                    high_c: temp + rng.gen_range(0..4),
                    low_c: temp - rng.gen_range(3..8),
                    condition: condition.to_string(),
                }
            })
            .collect())
    }
}

pub struct WeatherPlugin {
    service: Arc<dyn WeatherService>,
    default_location: String,
}

impl WeatherPlugin {
    pub fn new(service: Arc<dyn WeatherService>, default_location: String) -> Self {
        Self {
            service,
            default_location,
        }
    }
}

#[async_trait]
impl Plugin for WeatherPlugin {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Reports current weather"
    }

    fn supported_intents(&self) -> &[Intent] {
        &[Intent::Weather]
    }

    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;

        let location = request.param_or("location", &self.default_location);
        let observation = self.service.current(location).await?;

        Ok(Envelope::ok(format!(
            "Weather in {}: {}\u{b0}C, {} (humidity {}%, wind {} km/h)",
            observation.location,
            observation.temperature_c,
            observation.condition,
            observation.humidity,
            observation.wind_kmh
        ))
        .with("location", observation.location)
        .with("temperature_c", observation.temperature_c)
        .with("condition", observation.condition)
        .with("humidity", observation.humidity)
        .with("wind_kmh", observation.wind_kmh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct FixedWeather;

    #[async_trait]
    impl WeatherService for FixedWeather {
        async fn current(&self, location: &str) -> Result<WeatherObservation> {
            Ok(WeatherObservation {
                location: location.to_string(),
                temperature_c: 24,
                condition: "Partly Cloudy".into(),
                humidity: 65,
                wind_kmh: 10,
            })
        }
        async fn forecast(&self, _location: &str, _days: u32) -> Result<Vec<ForecastDay>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn reports_conditions_for_the_requested_location() {
        let plugin = WeatherPlugin::new(Arc::new(FixedWeather), "New York, NY".into());
        let mut parameters = BTreeMap::new();
        parameters.insert("location".to_string(), "Pune".to_string());
        let request = CommandRequest::new(Intent::Weather, parameters, "weather in pune");

        let envelope = plugin.execute(&request).await.unwrap();
        assert!(envelope.success);
        assert!(envelope.message.contains("Pune"));
        assert_eq!(envelope.get_str("condition"), Some("Partly Cloudy"));
    }

    #[tokio::test]
    async fn falls_back_to_configured_location() {
        let plugin = WeatherPlugin::new(Arc::new(FixedWeather), "New York, NY".into());
        let request = CommandRequest::new(Intent::Weather, BTreeMap::new(), "weather");
        let envelope = plugin.execute(&request).await.unwrap();
        assert_eq!(envelope.get_str("location"), Some("New York, NY"));
    }

    #[tokio::test]
    async fn simulated_provider_draws_from_the_condition_table() {
        let service = SimulatedWeather::new();
        let observation = service.current("anywhere").await.unwrap();
        assert!(CONDITIONS.iter().any(|(c, ..)| *c == observation.condition));
    }
}
