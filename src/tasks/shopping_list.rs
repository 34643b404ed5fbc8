//! Grocery price comparison against the budget.

use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::tasks::DailyTask;

/// Staples and their price (paise-free rupees) per store.
const PRICES: &[(&str, &[(&str, u32)])] = &[
    ("milk", &[("bigbasket", 56), ("dmart", 52), ("blinkit", 60)]),
    ("bread", &[("bigbasket", 40), ("dmart", 35), ("blinkit", 45)]),
    ("eggs", &[("bigbasket", 84), ("dmart", 78), ("blinkit", 90)]),
    ("rice", &[("bigbasket", 120), ("dmart", 110), ("blinkit", 135)]),
];

pub struct ShoppingListTask {
    budget_max: u32,
}

impl ShoppingListTask {
    pub fn new(budget_max: u32) -> Self {
        Self { budget_max }
    }

    fn cheapest() -> Vec<(String, String, u32)> {
        PRICES
            .iter()
            .filter_map(|(item, stores)| {
                stores
                    .iter()
                    .min_by_key(|(_, price)| *price)
                    .map(|(store, price)| (item.to_string(), store.to_string(), *price))
            })
            .collect()
    }
}

#[async_trait]
impl DailyTask for ShoppingListTask {
    fn name(&self) -> &'static str {
        "shopping"
    }

    fn label(&self) -> &'static str {
        "Shopping Assistant"
    }

    async fn run(&self) -> Envelope {
        let picks = Self::cheapest();
        let total: u32 = picks.iter().map(|(_, _, price)| price).sum();
        let lines: Vec<String> = picks
            .iter()
            .map(|(item, store, price)| format!("{} at {} (\u{20b9}{})", item, store, price))
            .collect();

        let message = if total <= self.budget_max {
            format!(
                "Best prices total \u{20b9}{} (within your \u{20b9}{} budget): {}",
                total,
                self.budget_max,
                lines.join(", ")
            )
        } else {
            format!(
                "Best prices total \u{20b9}{}, over your \u{20b9}{} budget: {}",
                total,
                self.budget_max,
                lines.join(", ")
            )
        };

        Envelope::ok(message)
            .with("total", total)
            .with("within_budget", total <= self.budget_max)
            .with("picks", lines)
    }
}
