//! Weather-appropriate outfit suggestions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::plugins::weather::WeatherService;
use crate::tasks::DailyTask;

const SUMMER: (&str, &str, &str) = ("T-shirt", "Shorts", "Sneakers");
const WINTER: (&str, &str, &str) = ("Sweater", "Jeans", "Boots");
const MID: (&str, &str, &str) = ("Light sweater", "Chinos", "Casual shoes");

pub struct DressTask {
    weather: Arc<dyn WeatherService>,
    location: String,
    style_tags: Vec<String>,
}

impl DressTask {
    pub fn new(weather: Arc<dyn WeatherService>, location: String, style_tags: Vec<String>) -> Self {
        Self {
            weather,
            location,
            style_tags,
        }
    }
}

#[async_trait]
impl DailyTask for DressTask {
    fn name(&self) -> &'static str {
        "dress"
    }

    fn label(&self) -> &'static str {
        "Dress & Style"
    }

    async fn run(&self) -> Envelope {
        let observation = match self.weather.current(&self.location).await {
            Ok(observation) => observation,
            Err(error) => {
                return Envelope::fail(format!(
                    "Can't pick an outfit without the weather: {}",
                    error
                ));
            }
        };

        let (top, bottom, footwear) = if observation.temperature_c > 20 {
            SUMMER
        } else if observation.temperature_c < 10 {
            WINTER
        } else {
            MID
        };
        let style = self
            .style_tags
            .first()
            .map(String::as_str)
            .unwrap_or("casual");

        Envelope::ok(format!(
            "It's {}\u{b0}C and {} in {} -- go with a {} and {} ({} style)",
            observation.temperature_c,
            observation.condition.to_lowercase(),
            observation.location,
            top.to_lowercase(),
            bottom.to_lowercase(),
            style
        ))
        .with("top", top)
        .with("bottom", bottom)
        .with("footwear", footwear)
        .with("style", style)
        .with("temperature_c", observation.temperature_c)
    }
}
