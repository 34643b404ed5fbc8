//! Reminder scheduling.
//!
//! Reminders live in an in-process store for the lifetime of the session.
//! The store sits behind a mutex so one plugin instance stays safe across
//! concurrent command cycles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use regex::Regex;
use tracing::info;

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{ensure_supported, CommandRequest, Plugin};

#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: u64,
    pub text: String,
    pub due: DateTime<Local>,
}

pub struct ReminderPlugin {
    reminders: Mutex<Vec<Reminder>>,
    next_id: AtomicU64,
}

impl ReminderPlugin {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of the stored reminders.
    pub fn reminders(&self) -> Vec<Reminder> {
        self.reminders.lock().expect("reminder store poisoned").clone()
    }
}

impl Default for ReminderPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for ReminderPlugin {
    fn name(&self) -> &str {
        "reminder"
    }

    fn description(&self) -> &str {
        "Sets and keeps reminders"
    }

    fn supported_intents(&self) -> &[Intent] {
        &[Intent::SetReminder]
    }

    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;

        let text = request.param_or("text", "General reminder").to_string();
        let due = parse_when(request.param_or("time", ""), Local::now());

        let reminder = Reminder {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            text: text.clone(),
            due,
        };
        info!("Reminder {} set for {}", reminder.id, reminder.due);
        let id = reminder.id;
        self.reminders
            .lock()
            .expect("reminder store poisoned")
            .push(reminder);

        Ok(Envelope::ok(format!(
            "Reminder set: \"{}\" for {}",
            text,
            due.format("%Y-%m-%d %H:%M")
        ))
        .with("reminder_id", id)
        .with("text", text)
        .with("due", due.format("%Y-%m-%d %H:%M").to_string()))
    }
}

/// Turns a matched time expression into a concrete due time.
///
/// Unparseable or missing expressions default to one hour out; a clock
/// time already past today rolls to tomorrow.
pub fn parse_when(expression: &str, now: DateTime<Local>) -> DateTime<Local> {
    static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(\d{1,2})(?::(\d{2}))?\s*(am|pm)").expect("invalid clock pattern")
    });
    static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"in\s*(\d+)\s*(minute|hour|day)s?").expect("invalid relative pattern")
    });

    let expression = expression.trim().to_lowercase();

    if let Some(captures) = RELATIVE.captures(&expression) {
        let amount: i64 = captures[1].parse().unwrap_or(1);
        return match &captures[2] {
            "minute" => now + Duration::minutes(amount),
            "hour" => now + Duration::hours(amount),
            _ => now + Duration::days(amount),
        };
    }

    if let Some(captures) = CLOCK.captures(&expression) {
        let mut hour: u32 = captures[1].parse().unwrap_or(0) % 12;
        if &captures[3] == "pm" {
            hour += 12;
        }
        let minute: u32 = captures
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            let mut date = now.date_naive();
            if time <= now.time() {
                date += Duration::days(1);
            }
            if let Some(due) = Local.from_local_datetime(&date.and_time(time)).single() {
                return due;
            }
        }
    }

    match expression.as_str() {
        "tomorrow" => (now + Duration::days(1))
            .with_time(NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"))
            .single()
            .unwrap_or(now + Duration::days(1)),
        "tonight" => now
            .with_time(NaiveTime::from_hms_opt(20, 0, 0).expect("valid time"))
            .single()
            .unwrap_or(now),
        "next week" => now + Duration::weeks(1),
        _ => now + Duration::hours(1),
    }
}
