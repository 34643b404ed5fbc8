//! Today's agenda from the recurring schedule.

use async_trait::async_trait;
use chrono::{Datelike, Local, Weekday};

use crate::envelope::Envelope;
use crate::tasks::DailyTask;

const RECURRING: &[(&str, Weekday, &str)] = &[
    ("Team Meeting", Weekday::Mon, "09:00"),
    ("Gym Workout", Weekday::Tue, "18:00"),
    ("Gym Workout", Weekday::Thu, "18:00"),
    ("Weekly Review", Weekday::Fri, "16:00"),
];

pub struct CalendarTask;

impl CalendarTask {
    pub fn new() -> Self {
        Self
    }

    fn agenda_for(weekday: Weekday) -> Vec<String> {
        RECURRING
            .iter()
            .filter(|(_, day, _)| *day == weekday)
            .map(|(title, _, time)| format!("{} at {}", title, time))
            .collect()
    }
}

impl Default for CalendarTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DailyTask for CalendarTask {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn label(&self) -> &'static str {
        "Calendar"
    }

    async fn run(&self) -> Envelope {
        let today = Local::now();
        let agenda = Self::agenda_for(today.weekday());

        if agenda.is_empty() {
            return Envelope::ok(format!("Nothing scheduled for {}", today.format("%A")))
                .with("events", Vec::<String>::new());
        }
        Envelope::ok(format!(
            "{} schedule: {}",
            today.format("%A"),
            agenda.join(", ")
        ))
        .with("events", agenda)
    }
}
