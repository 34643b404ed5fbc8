//! Language-model fallback for classification and open-ended replies.
//!
//! The rule table handles the common command shapes; when it comes up
//! empty the router can delegate here. Every transport or parse failure is
//! an `Err` the router degrades from (back to the rule result or a
//! clarifying prompt) -- assist trouble is never allowed to become a
//! process fault, and the core stays fully functional with no credential
//! at all.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::intent::{Classification, ClassificationMethod, Intent};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const MODEL: &str = "claude-3-haiku-20240307";

/// Shape the analysis prompt asks the model to produce.
#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    intent: String,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
    confidence: f32,
}

/// External language-model boundary.
#[async_trait]
pub trait Assist: Send + Sync {
    /// Analyzes a command the rule table could not place.
    async fn analyze(&self, command: &str) -> Result<Classification>;

    /// Generates a conversational reply for an unrecognized command.
    async fn reply(&self, query: &str) -> Result<String>;
}

pub struct LlmAssist {
    http: Arc<dyn HttpClient>,
    api_key: String,
}

impl LlmAssist {
    pub fn new(api_key: String) -> Self {
        Self::with_client(api_key, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_client(api_key: String, http: Arc<dyn HttpClient>) -> Self {
        Self { http, api_key }
    }

    fn analysis_prompt(command: &str) -> String {
        let intents = Intent::ALL
            .iter()
            .map(Intent::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CRITICAL: Your response must be EXACTLY a JSON object. No explanations, no code blocks, no other text.\n\n\
             Classify this user command: \"{}\"\n\n\
             Known intents: {}. Use intent \"none\" when nothing fits.\n\n\
             RESPOND WITH EXACTLY THIS FORMAT (with your values):\n\
             {{\n  \"intent\": \"order_food\",\n  \"parameters\": {{\"item\": \"pizza\"}},\n  \"confidence\": 0.9\n}}\n\n\
             RULES:\n\
             - parameters map extracted values by name (item, platform, quantity, movie, time, text, query)\n\
             - confidence is 0.0-1.0\n\
             - CRITICAL: RESPOND ONLY WITH THE JSON OBJECT ABOVE - NO OTHER TEXT",
            command, intents
        )
    }

    async fn call_api(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request_body = json!({
            "model": MODEL,
            "max_tokens": max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let response_text = self
            .http
            .post_json(
                API_URL,
                &[
                    ("x-api-key", self.api_key.as_str()),
                    ("content-type", "application/json"),
                    ("anthropic-version", "2023-06-01"),
                ],
                &request_body,
            )
            .await?;

        // Pull content[0].text out of the messages response.
        let parsed: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|_| anyhow!("assist API returned non-JSON response: {}", response_text))?;
        parsed
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|item| item.get("text"))
            .and_then(|text| text.as_str())
            .map(|text| text.to_string())
            .ok_or_else(|| anyhow!("assist API response had no content: {}", response_text))
    }
}

#[async_trait]
impl Assist for LlmAssist {
    async fn analyze(&self, command: &str) -> Result<Classification> {
        info!("Delegating classification to assist: {}", command);
        let content = self.call_api(&Self::analysis_prompt(command), 300).await?;

        let payload: AnalysisPayload = serde_json::from_str(&content).map_err(|_| {
            warn!("Failed to parse assist analysis: {}", content);
            anyhow!("assist returned malformed analysis")
        })?;

        // Unknown labels collapse to the unrecognized outcome rather than
        // failing the whole analysis.
        let intent = payload.intent.parse::<Intent>().ok();
        Ok(Classification {
            intent,
            parameters: payload.parameters,
            confidence: payload.confidence.clamp(0.0, 1.0),
            method: ClassificationMethod::Assist,
        })
    }

    async fn reply(&self, query: &str) -> Result<String> {
        let prompt = format!(
            "You are Cog, a helpful personal assistant. Be friendly and concise; \
             if you don't know something, say so.\n\nUser: {}",
            query
        );
        let content = self.call_api(&prompt, 300).await?;
        Ok(content.trim().to_string())
    }
}

/// Deterministic stand-in used in mock mode and tests.
pub struct MockAssist;

impl MockAssist {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockAssist {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Assist for MockAssist {
    async fn analyze(&self, command: &str) -> Result<Classification> {
        let lowered = command.to_lowercase();
        let intent = if lowered.contains("hungry") || lowered.contains("eat") {
            Some(Intent::OrderFood)
        } else if lowered.contains("bored") {
            Some(Intent::BookMovie)
        } else {
            None
        };
        Ok(Classification {
            intent,
            parameters: BTreeMap::new(),
            confidence: if intent.is_some() { 0.6 } else { 0.0 },
            method: ClassificationMethod::Assist,
        })
    }

    async fn reply(&self, query: &str) -> Result<String> {
        Ok(format!(
            "I'm running without a language model right now, but I heard: \"{}\". \
             Try asking me to order food, book a movie, or set a reminder.",
            query.trim()
        ))
    }
}
