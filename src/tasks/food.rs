//! Meal planning and restaurant suggestions.

use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::tasks::DailyTask;

/// Restaurant shortlist per cuisine: (name, rating, avg price, minutes).
const RESTAURANTS: &[(&str, &[(&str, f64, u32, u32)])] = &[
    ("italian", &[
        ("Luigi's Pizza", 4.5, 25, 30),
        ("Mama Mia's", 4.8, 35, 45),
    ]),
    ("indian", &[
        ("Spice Garden", 4.6, 22, 25),
        ("Tandoor Express", 4.7, 30, 35),
    ]),
    ("mexican", &[
        ("El Sombrero", 4.3, 18, 20),
        ("Taco Fiesta", 4.5, 24, 30),
    ]),
    ("chinese", &[
        ("Golden Dragon", 4.4, 26, 35),
        ("Szechuan Palace", 4.7, 32, 40),
    ]),
    ("american", &[
        ("Burger Junction", 4.3, 16, 25),
        ("BBQ Master", 4.6, 28, 35),
    ]),
];

pub struct MealPlanTask {
    cuisines: Vec<String>,
}

impl MealPlanTask {
    pub fn new(cuisines: Vec<String>) -> Self {
        Self { cuisines }
    }
}

#[async_trait]
impl DailyTask for MealPlanTask {
    fn name(&self) -> &'static str {
        "food"
    }

    fn label(&self) -> &'static str {
        "Food Ordering"
    }

    async fn run(&self) -> Envelope {
        let mut suggestions = Vec::new();
        for cuisine in &self.cuisines {
            if let Some((_, restaurants)) =
                RESTAURANTS.iter().find(|(name, _)| *name == cuisine.as_str())
            {
                // Highest-rated place per preferred cuisine.
                if let Some((name, rating, price, minutes)) = restaurants
                    .iter()
                    .max_by(|a, b| a.1.total_cmp(&b.1))
                {
                    suggestions.push(format!(
                        "{} ({}, {:.1}\u{2605}, ~\u{20b9}{}, {} min)",
                        name, cuisine, rating, price, minutes
                    ));
                }
            }
        }

        if suggestions.is_empty() {
            return Envelope::fail(format!(
                "No restaurant suggestions for cuisines: {}",
                self.cuisines.join(", ")
            ));
        }

        Envelope::ok(format!("Today's picks: {}", suggestions.join("; ")))
            .with("suggestions", suggestions)
    }
}
