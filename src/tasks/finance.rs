//! Budget check across spending categories.

use async_trait::async_trait;
use rand::Rng;

use crate::envelope::Envelope;
use crate::tasks::DailyTask;

const CATEGORIES: &[(&str, u32)] = &[
    ("housing", 1500),
    ("food", 600),
    ("transportation", 400),
    ("utilities", 200),
    ("entertainment", 300),
    ("savings", 500),
];

pub struct FinanceTask {
    budget_min: u32,
    budget_max: u32,
}

impl FinanceTask {
    pub fn new(budget_min: u32, budget_max: u32) -> Self {
        Self {
            budget_min,
            budget_max,
        }
    }
}

#[async_trait]
impl DailyTask for FinanceTask {
    fn name(&self) -> &'static str {
        "finance"
    }

    fn label(&self) -> &'static str {
        "Finance"
    }

    async fn run(&self) -> Envelope {
        // Simulated month-to-date spend per category, up to 120% of its
        // limit; spends are the documented non-deterministic fields.
        let mut rng = rand::thread_rng();
        let mut over_budget = Vec::new();
        let mut total_spent = 0;
        let mut total_limit = 0;

        for (category, limit) in CATEGORIES {
            let spent = rng.gen_range(0..=(limit * 12 / 10));
            total_spent += spent;
            total_limit += limit;
            if spent > *limit {
                over_budget.push(format!("{} (\u{20b9}{} of \u{20b9}{})", category, spent, limit));
            }
        }

        let message = if over_budget.is_empty() {
            format!(
                "Spending on track: \u{20b9}{} of \u{20b9}{} across {} categories",
                total_spent,
                total_limit,
                CATEGORIES.len()
            )
        } else {
            format!(
                "\u{20b9}{} of \u{20b9}{} spent; over budget in: {}",
                total_spent,
                total_limit,
                over_budget.join(", ")
            )
        };

        Envelope::ok(message)
            .with("total_spent", total_spent)
            .with("total_limit", total_limit)
            .with("over_budget_count", over_budget.len())
            .with("discretionary_range", format!("{}-{}", self.budget_min, self.budget_max))
    }
}
