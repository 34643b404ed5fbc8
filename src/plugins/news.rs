//! News headlines.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{ensure_supported, CommandRequest, Plugin};

/// Seam to a headline provider.
#[async_trait]
pub trait NewsService: Send + Sync {
    async fn headlines(&self, category: &str) -> Result<Vec<String>>;
}

/// Simulated feed with a fixed set of headlines.
pub struct SimulatedNewsFeed;

impl SimulatedNewsFeed {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedNewsFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsService for SimulatedNewsFeed {
    async fn headlines(&self, _category: &str) -> Result<Vec<String>> {
        Ok(vec![
            "Tech stocks rise amid AI optimism".to_string(),
            "New breakthrough in renewable energy".to_string(),
            "Global climate summit concludes with new agreements".to_string(),
        ])
    }
}

pub struct NewsPlugin {
    service: Arc<dyn NewsService>,
}

impl NewsPlugin {
    pub fn new(service: Arc<dyn NewsService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Plugin for NewsPlugin {
    fn name(&self) -> &str {
        "news"
    }

    fn description(&self) -> &str {
        "Fetches latest news headlines"
    }

    fn supported_intents(&self) -> &[Intent] {
        &[Intent::News]
    }

    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;

        let category = request.param_or("category", "general");
        let headlines = self.service.headlines(category).await?;
        if headlines.is_empty() {
            return Ok(Envelope::fail(format!("No {} headlines right now.", category)));
        }

        let preview = headlines
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");
        Ok(Envelope::ok(format!("Latest {} news: {}", category, preview))
            .with("category", category)
            .with("headlines", headlines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn previews_the_first_two_headlines() {
        let plugin = NewsPlugin::new(Arc::new(SimulatedNewsFeed::new()));
        let request = CommandRequest::new(Intent::News, BTreeMap::new(), "latest news");
        let envelope = plugin.execute(&request).await.unwrap();

        assert!(envelope.success);
        assert!(envelope.message.contains("Tech stocks"));
        assert_eq!(
            envelope.get("headlines").and_then(|v| v.as_array()).map(Vec::len),
            Some(3)
        );
    }

    #[tokio::test]
    async fn empty_feed_is_a_domain_miss() {
        struct EmptyFeed;
        #[async_trait]
        impl NewsService for EmptyFeed {
            async fn headlines(&self, _category: &str) -> Result<Vec<String>> {
                Ok(vec![])
            }
        }

        let plugin = NewsPlugin::new(Arc::new(EmptyFeed));
        let request = CommandRequest::new(Intent::News, BTreeMap::new(), "news");
        let envelope = plugin.execute(&request).await.unwrap();
        assert!(!envelope.success);
    }
}
