//! Uniform result envelope returned by every handled command.
//!
//! Plugins, the dispatcher, and the task orchestrator all produce an
//! [`Envelope`]; the presentation layer consumes nothing else. Failures are
//! envelopes with `success == false`, never panics or propagated faults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{success, message, data}` record produced by every command cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Envelope {
    /// Creates a successful envelope with the given user-facing message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Creates a failure envelope. The message must explain what went wrong
    /// in user-facing terms; it is the only channel errors travel on.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Attaches a data field, builder style.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    /// Looks up a data field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns a data field as a string slice, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
