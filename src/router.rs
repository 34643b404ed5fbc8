//! Command routing.
//!
//! One command in, one envelope out. The router classifies the text,
//! answers the conversational built-ins itself, hands everything else to
//! the plugin registry, and falls back to the language-model assist for
//! input the rule table cannot place. Nothing that happens past the
//! classifier can fault the command cycle.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::assist::{Assist, LlmAssist, MockAssist};
use crate::config::Config;
use crate::envelope::Envelope;
use crate::intent::{Classification, Classifier, Intent};
use crate::plugins;
use crate::registry::PluginRegistry;

/// Below this the router treats a classification as a guess and asks the
/// assist (or the user) instead of dispatching.
const CONFIDENCE_THRESHOLD: f32 = 0.5;

const CLARIFY_MESSAGE: &str =
    "I didn't understand that. Could you rephrase your request?";

pub struct CommandRouter {
    classifier: Classifier,
    registry: PluginRegistry,
    assist: Option<Arc<dyn Assist>>,
}

impl CommandRouter {
    /// Builds the router with the built-in plugin set and whatever assist
    /// the configuration allows: mock mode gets the deterministic assist,
    /// an API key gets the real one, and no credential gets none -- the
    /// rule-based core works regardless.
    pub fn new(config: &Config) -> Result<Self> {
        let mut registry = PluginRegistry::new();
        plugins::install_builtins(&mut registry, config)?;

        let assist: Option<Arc<dyn Assist>> = if config.is_mock_mode() {
            info!("Using mock assist (COGNET_USE_MOCK)");
            Some(Arc::new(MockAssist::new()))
        } else if let Some(api_key) = config.api_key() {
            Some(Arc::new(LlmAssist::new(api_key.clone())))
        } else {
            info!("No API key configured; running rule-based only");
            None
        };

        Ok(Self {
            classifier: Classifier::new(),
            registry,
            assist,
        })
    }

    /// Assembles a router from explicit parts.
    pub fn with_parts(
        classifier: Classifier,
        registry: PluginRegistry,
        assist: Option<Arc<dyn Assist>>,
    ) -> Self {
        Self {
            classifier,
            registry,
            assist,
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Processes one command into an envelope. Infallible by contract:
    /// every failure mode ends as a `success=false` envelope.
    pub async fn process(&self, command: &str) -> Envelope {
        let command = command.trim();
        if command.is_empty() {
            return Envelope::fail(CLARIFY_MESSAGE);
        }

        info!("Processing command: {}", command);
        let classification = self.resolve_classification(command).await;

        let Some(intent) = classification.intent else {
            return self.fallback_reply(command).await;
        };
        if classification.confidence < CONFIDENCE_THRESHOLD {
            return Envelope::fail(CLARIFY_MESSAGE).with("intent", intent.as_str());
        }

        match intent {
            Intent::Greeting => Envelope::ok(
                "Hello! I'm Cog, your assistant. How can I help you today?",
            )
            .with("action", "greeting"),
            Intent::Goodbye => Envelope::ok("Goodbye! Have a great day!")
                .with("action", "goodbye"),
            Intent::Help => self.help_envelope(),
            Intent::Status => self.status_envelope(),
            _ => {
                self.registry
                    .dispatch(intent, classification.parameters, command)
                    .await
            }
        }
    }

    /// Rule-table classification, with the assist consulted when the table
    /// comes up empty or unsure. Assist trouble degrades to the rule
    /// result.
    async fn resolve_classification(&self, command: &str) -> Classification {
        let rule_result = self.classifier.classify(command);
        if rule_result.intent.is_some() && rule_result.confidence >= CONFIDENCE_THRESHOLD {
            return rule_result;
        }

        let Some(assist) = &self.assist else {
            return rule_result;
        };
        match assist.analyze(command).await {
            Ok(analysis)
                if analysis.intent.is_some()
                    && analysis.confidence >= CONFIDENCE_THRESHOLD =>
            {
                if let Some(intent) = analysis.intent {
                    info!("Assist classified '{}' as {}", command, intent);
                }
                analysis
            }
            Ok(_) => rule_result,
            Err(error) => {
                warn!("Assist analysis failed, keeping rule result: {:#}", error);
                rule_result
            }
        }
    }

    async fn fallback_reply(&self, command: &str) -> Envelope {
        if let Some(assist) = &self.assist {
            match assist.reply(command).await {
                Ok(reply) => return Envelope::ok(reply).with("action", "chat"),
                Err(error) => {
                    warn!("Assist reply failed: {:#}", error);
                }
            }
        }
        Envelope::fail(CLARIFY_MESSAGE)
    }

    fn help_envelope(&self) -> Envelope {
        let mut lines = vec!["Here's what I can help you with:".to_string()];
        for info in self.registry.plugin_info() {
            lines.push(format!(
                "  - {}: {} ({})",
                info.name,
                info.description,
                info.intents.join(", ")
            ));
        }
        lines.push("Try: \"order pizza from swiggy\" or \"what's the weather like?\"".to_string());
        Envelope::ok(lines.join("\n")).with("action", "help")
    }

    fn status_envelope(&self) -> Envelope {
        Envelope::ok(format!(
            "System online. {} plugins loaded, assist {}.",
            self.registry.len(),
            if self.assist.is_some() { "available" } else { "not configured" }
        ))
        .with("action", "status")
        .with("plugin_count", self.registry.len())
    }
}
