//! Cognet - intent-dispatch assistant core.
//!
//! This library maps free-text commands to plugins through a rule-based
//! intent classifier, and runs a fixed battery of daily tasks. It supports:
//!
//! - **Intent classification** via an ordered regex decision table
//! - **Plugin dispatch** with first-registered-wins tie-breaking
//! - **Uniform result envelopes** for every outcome, success or failure
//! - **Language-model fallback** for commands the rules can't place
//! - **Daily task batches** with partial-failure reporting
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management (API key, voice, preferences)
//! - [`intent`] - Intent labels and the rule-table classifier
//! - [`envelope`] - The `{success, message, data}` result record
//! - [`plugin`] - The plugin capability contract
//! - [`registry`] - Plugin registration and dispatch
//! - [`plugins`] - Built-in plugins and their service seams
//! - [`router`] - One-command-in, one-envelope-out routing
//! - [`assist`] - Language-model boundary with graceful degradation
//! - [`tasks`] - The daily task battery and orchestrator
//! - [`console`] - Menus, prompts, and envelope rendering
//! - [`http_client`] - HTTP client abstraction
//!
//! # Example
//!
//! ```ignore
//! use cognet::config::Config;
//! use cognet::router::CommandRouter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let router = CommandRouter::new(&config)?;
//!
//!     let envelope = router.process("order pizza from swiggy").await;
//!     println!("{}", envelope.message);
//!
//!     Ok(())
//! }
//! ```
//!
//! Every failure past startup is an envelope with `success == false`;
//! dispatching never faults the process. Plugins reach their platforms
//! through injectable service traits, so the shipped simulations can be
//! swapped for real integrations without touching dispatch.

pub mod assist;
pub mod config;
pub mod console;
pub mod envelope;
pub mod http_client;
pub mod intent;
pub mod plugin;
pub mod plugins;
pub mod registry;
pub mod router;
pub mod tasks;
