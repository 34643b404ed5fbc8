//! Built-in plugins and their service seams.
//!
//! Every plugin reaches its platform through a service trait defined next
//! to it; the `Simulated*` implementations shipped here mint synthetic
//! confirmations and stand where a real integration would plug in.

pub mod food_ordering;
pub mod movie_booking;
pub mod news;
pub mod reminder;
pub mod search;
pub mod shopping;
pub mod weather;

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::registry::PluginRegistry;

pub use food_ordering::{FoodDeliveryService, FoodOrderingPlugin, SimulatedFoodDelivery};
pub use movie_booking::{MovieBookingPlugin, SimulatedTicketing, TicketingService};
pub use news::{NewsPlugin, NewsService, SimulatedNewsFeed};
pub use reminder::ReminderPlugin;
pub use search::{SearchPlugin, SearchService, SimulatedSearchIndex};
pub use shopping::{ShoppingPlugin, ShoppingService, SimulatedStorefront};
pub use weather::{SimulatedWeather, WeatherPlugin, WeatherService};

/// Registers the built-in plugin set with simulated service backends.
///
/// Registration order is dispatch order.
pub fn install_builtins(registry: &mut PluginRegistry, config: &Config) -> Result<()> {
    registry.register(Arc::new(FoodOrderingPlugin::new(Arc::new(
        SimulatedFoodDelivery::new(),
    ))))?;
    registry.register(Arc::new(MovieBookingPlugin::new(Arc::new(
        SimulatedTicketing::new(),
    ))))?;
    registry.register(Arc::new(ShoppingPlugin::new(Arc::new(
        SimulatedStorefront::new(),
    ))))?;
    registry.register(Arc::new(ReminderPlugin::new()))?;
    registry.register(Arc::new(WeatherPlugin::new(
        Arc::new(SimulatedWeather::new()),
        config.preferences.location.clone(),
    )))?;
    registry.register(Arc::new(NewsPlugin::new(Arc::new(SimulatedNewsFeed::new()))))?;
    registry.register(Arc::new(SearchPlugin::new(Arc::new(
        SimulatedSearchIndex::new(),
    ))))?;
    Ok(())
}
