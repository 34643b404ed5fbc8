//! Console presentation: envelope rendering, the daily-task menu, and
//! line prompts for the interactive session.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::envelope::Envelope;
use crate::tasks::{TaskOrchestrator, TaskOutcome, TaskReport};

pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }

    pub fn show_welcome(&self) {
        println!("🤖 Cog at your service. Type a command, or \"help\" to see what I can do.");
        println!("   (\"exit\" to leave)");
    }

    pub fn show_envelope(&self, envelope: &Envelope) {
        let marker = if envelope.success { "✅" } else { "❌" };
        println!("{} {}", marker, envelope.message);
    }

    /// Numbered task menu: one entry per declared task, then run-all and
    /// exit.
    pub fn show_menu(&self, orchestrator: &TaskOrchestrator) {
        println!("\nDaily tasks:");
        for (index, task) in orchestrator.tasks().enumerate() {
            println!("  {}. {}", index + 1, task.label());
        }
        println!("  {}. Run all tasks", orchestrator.len() + 1);
        println!("  0. Exit");
    }

    pub fn show_outcome(&self, outcome: &TaskOutcome) {
        let marker = if outcome.envelope.success { "✅" } else { "❌" };
        println!("{} [{}] {}", marker, outcome.name, outcome.envelope.message);
    }

    pub fn show_report(&self, report: &TaskReport) {
        println!("\nDaily report:");
        for outcome in &report.outcomes {
            self.show_outcome(outcome);
        }
        println!(
            "{} completed, {} failed",
            report.completed().len(),
            report.failed().len()
        );
    }

    /// Reads one line from stdin. `Ok(None)` means end of input.
    pub fn prompt(&self, label: &str) -> Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
