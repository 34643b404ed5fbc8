//! Search queries.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{ensure_supported, CommandRequest, Plugin};

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// Seam to a search backend.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Simulated index returning placeholder hits for any query.
pub struct SimulatedSearchIndex;

impl SimulatedSearchIndex {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchService for SimulatedSearchIndex {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        Ok((1..=3)
            .map(|i| SearchHit {
                title: format!("Result {} for {}", i, query),
                url: format!("https://example.com/{}", i),
            })
            .collect())
    }
}

pub struct SearchPlugin {
    service: Arc<dyn SearchService>,
}

impl SearchPlugin {
    pub fn new(service: Arc<dyn SearchService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Plugin for SearchPlugin {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Searches for information"
    }

    fn supported_intents(&self) -> &[Intent] {
        &[Intent::Search]
    }

    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;

        // Fall back to the raw command when no query was extracted.
        let query = request
            .param("query")
            .unwrap_or(&request.raw_command)
            .to_string();
        let hits = self.service.search(&query).await?;

        let titles: Vec<String> = hits.iter().map(|h| h.title.clone()).collect();
        let urls: Vec<String> = hits.iter().map(|h| h.url.clone()).collect();
        Ok(
            Envelope::ok(format!("Found {} results for \"{}\"", hits.len(), query))
                .with("query", query)
                .with("titles", titles)
                .with("urls", urls),
        )
    }
}
