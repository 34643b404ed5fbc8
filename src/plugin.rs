//! The plugin capability contract.
//!
//! A plugin declares the intents it handles and executes classified
//! commands into [`Envelope`]s. Plugins are registered once at startup,
//! shared behind `Arc`, and hold no mutable state between invocations
//! beyond injected configuration or service handles, so a single instance
//! can serve concurrent command cycles.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::intent::Intent;

/// One classified command, handed to a plugin for execution.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub intent: Intent,
    pub parameters: BTreeMap<String, String>,
    pub raw_command: String,
}

impl CommandRequest {
    pub fn new(
        intent: Intent,
        parameters: BTreeMap<String, String>,
        raw_command: impl Into<String>,
    ) -> Self {
        Self {
            intent,
            parameters,
            raw_command: raw_command.into(),
        }
    }

    /// Looks up an extracted parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Looks up an extracted parameter, falling back to a default.
    pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.param(key).unwrap_or(default)
    }

    /// Parses a numeric parameter, falling back to a default on absence or
    /// malformed input.
    pub fn param_u32_or(&self, key: &str, default: u32) -> u32 {
        self.param(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

/// A self-contained handler for one or more intents.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique plugin name; the registry rejects duplicates.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// The intents this plugin declares support for.
    fn supported_intents(&self) -> &[Intent];

    /// Pure predicate over the declared intent set.
    fn supports(&self, intent: Intent) -> bool {
        self.supported_intents().contains(&intent)
    }

    /// Executes the command. Callers must only invoke this when
    /// [`Plugin::supports`] holds for the request's intent; plugins guard
    /// that contract with [`ensure_supported`] and fail fast otherwise.
    ///
    /// Domain failures (unsupported platform, nothing matching) are
    /// `success=false` envelopes; an `Err` is reserved for contract
    /// violations and broken service seams, and is converted to a failure
    /// envelope by the dispatcher.
    async fn execute(&self, request: &CommandRequest) -> Result<Envelope>;
}

/// Fails fast when a plugin is executed for an intent it never declared.
pub fn ensure_supported(plugin: &dyn Plugin, intent: Intent) -> Result<()> {
    if !plugin.supports(intent) {
        bail!(
            "plugin '{}' does not support intent '{}'",
            plugin.name(),
            intent
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoPlugin;

    #[async_trait]
    impl Plugin for EchoPlugin {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes the raw command"
        }
        fn supported_intents(&self) -> &[Intent] {
            &[Intent::Search]
        }
        async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
            ensure_supported(self, request.intent)?;
            Ok(Envelope::ok(request.raw_command.clone()))
        }
    }

    #[test]
    fn supports_is_a_pure_predicate_over_declared_intents() {
        let plugin = EchoPlugin;
        assert!(plugin.supports(Intent::Search));
        assert!(!plugin.supports(Intent::Weather));
    }

    #[tokio::test]
    async fn executing_an_undeclared_intent_fails_fast() {
        let plugin = EchoPlugin;
        let request = CommandRequest::new(Intent::Weather, BTreeMap::new(), "whatever");
        let err = plugin.execute(&request).await.unwrap_err();
        assert!(err.to_string().contains("does not support"));
    }

    #[test]
    fn request_param_helpers() {
        let mut parameters = BTreeMap::new();
        parameters.insert("quantity".to_string(), "3".to_string());
        parameters.insert("bad".to_string(), "x".to_string());
        let request = CommandRequest::new(Intent::OrderFood, parameters, "order 3 pizza");

        assert_eq!(request.param("quantity"), Some("3"));
        assert_eq!(request.param_or("platform", "swiggy"), "swiggy");
        assert_eq!(request.param_u32_or("quantity", 1), 3);
        assert_eq!(request.param_u32_or("bad", 1), 1);
        assert_eq!(request.param_u32_or("missing", 1), 1);
    }
}
