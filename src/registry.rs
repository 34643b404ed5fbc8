//! Plugin registry and dispatcher.
//!
//! Plugins are held in registration order; dispatch walks that order and
//! the first plugin whose `supports(intent)` holds wins, so overlapping
//! capability claims resolve the same way on every call. Dispatch is
//! infallible: missing handlers and plugin errors both come back as
//! `success=false` envelopes.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{CommandRequest, Plugin};

/// Introspection record for one registered plugin.
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub intents: Vec<&'static str>,
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Adds a plugin at the end of the dispatch order.
    ///
    /// Duplicate names are rejected: silently overwriting would reorder
    /// dispatch behind the caller's back.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<()> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            bail!("plugin '{}' is already registered", plugin.name());
        }
        info!("Registered plugin: {}", plugin.name());
        self.plugins.push(plugin);
        Ok(())
    }

    /// Routes a classified intent to the first supporting plugin.
    ///
    /// Always returns a well-formed envelope; an unrecognized or unhandled
    /// intent is a `success=false` outcome, never a fault.
    pub async fn dispatch(
        &self,
        intent: Intent,
        parameters: BTreeMap<String, String>,
        raw_command: &str,
    ) -> Envelope {
        let Some(plugin) = self.plugins.iter().find(|p| p.supports(intent)) else {
            warn!("No plugin registered for intent: {}", intent);
            return Envelope::fail(format!(
                "I don't have a handler for \"{}\" requests yet.",
                intent
            ))
            .with("intent", intent.as_str());
        };

        info!("Dispatching intent '{}' to plugin '{}'", intent, plugin.name());
        let request = CommandRequest::new(intent, parameters, raw_command);
        match plugin.execute(&request).await {
            Ok(envelope) => envelope.with("plugin_used", plugin.name()),
            Err(error) => {
                warn!("Plugin '{}' failed: {:#}", plugin.name(), error);
                Envelope::fail(format!(
                    "The {} plugin could not complete that request: {}",
                    plugin.name(),
                    error
                ))
                .with("plugin_used", plugin.name())
            }
        }
    }

    /// Names of every plugin claiming the intent, in dispatch order.
    pub fn plugins_for(&self, intent: Intent) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|p| p.supports(intent))
            .map(|p| p.name())
            .collect()
    }

    pub fn plugin_info(&self) -> Vec<PluginInfo> {
        self.plugins
            .iter()
            .map(|p| PluginInfo {
                name: p.name().to_string(),
                description: p.description().to_string(),
                intents: p.supported_intents().iter().map(Intent::as_str).collect(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::ensure_supported;
    use async_trait::async_trait;

    struct StubPlugin {
        name: &'static str,
        intents: Vec<Intent>,
        fail: bool,
    }

    impl StubPlugin {
        fn new(name: &'static str, intents: Vec<Intent>) -> Arc<Self> {
            Arc::new(Self {
                name,
                intents,
                fail: false,
            })
        }

        fn failing(name: &'static str, intents: Vec<Intent>) -> Arc<Self> {
            Arc::new(Self {
                name,
                intents,
                fail: true,
            })
        }
    }

    #[async_trait]
    impl Plugin for StubPlugin {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "stub"
        }
        fn supported_intents(&self) -> &[Intent] {
            &self.intents
        }
        async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
            ensure_supported(self, request.intent)?;
            if self.fail {
                bail!("service unavailable");
            }
            Ok(Envelope::ok(format!("handled by {}", self.name)))
        }
    }

    #[tokio::test]
    async fn dispatch_routes_to_a_supporting_plugin() {
        let mut registry = PluginRegistry::new();
        registry
            .register(StubPlugin::new("weather", vec![Intent::Weather]))
            .unwrap();

        let envelope = registry
            .dispatch(Intent::Weather, BTreeMap::new(), "weather please")
            .await;
        assert!(envelope.success);
        assert_eq!(envelope.get_str("plugin_used"), Some("weather"));
    }

    #[tokio::test]
    async fn dispatch_without_handler_is_a_failure_envelope() {
        let registry = PluginRegistry::new();
        let envelope = registry
            .dispatch(Intent::News, BTreeMap::new(), "news")
            .await;
        assert!(!envelope.success);
        assert!(!envelope.message.is_empty());
        assert_eq!(envelope.get_str("intent"), Some("news"));
    }

    #[tokio::test]
    async fn first_registered_plugin_wins_ties_stably() {
        let mut registry = PluginRegistry::new();
        registry
            .register(StubPlugin::new("first", vec![Intent::Shopping]))
            .unwrap();
        registry
            .register(StubPlugin::new("second", vec![Intent::Shopping]))
            .unwrap();

        for _ in 0..3 {
            let envelope = registry
                .dispatch(Intent::Shopping, BTreeMap::new(), "buy a dress")
                .await;
            assert_eq!(envelope.get_str("plugin_used"), Some("first"));
        }
        assert_eq!(registry.plugins_for(Intent::Shopping), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn plugin_error_becomes_failure_envelope() {
        let mut registry = PluginRegistry::new();
        registry
            .register(StubPlugin::failing("flaky", vec![Intent::News]))
            .unwrap();

        let envelope = registry.dispatch(Intent::News, BTreeMap::new(), "news").await;
        assert!(!envelope.success);
        assert!(envelope.message.contains("flaky"));
        assert_eq!(envelope.get_str("plugin_used"), Some("flaky"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = PluginRegistry::new();
        registry
            .register(StubPlugin::new("dup", vec![Intent::News]))
            .unwrap();
        let err = registry
            .register(StubPlugin::new("dup", vec![Intent::Weather]))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));
        assert_eq!(registry.len(), 1);
    }
}
