//! Food ordering across delivery platforms.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{ensure_supported, CommandRequest, Plugin};

/// Confirmation returned by a delivery platform for a placed order.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub platform: String,
    pub item: String,
    pub quantity: u32,
    pub subtotal: u32,
    pub delivery_charge: u32,
    pub taxes: u32,
    pub total: u32,
    pub eta: String,
}

/// Seam to a food-delivery platform. The shipped implementation simulates
/// the platform; a real integration replaces this trait impl, not the
/// plugin.
#[async_trait]
pub trait FoodDeliveryService: Send + Sync {
    async fn place_order(
        &self,
        platform: &str,
        item: &str,
        quantity: u32,
    ) -> Result<OrderConfirmation>;
}

/// Simulated delivery platform. Prices come from a fixed menu table;
/// order ids and ETAs are synthetic and documented as non-deterministic.
pub struct SimulatedFoodDelivery;

const MENU_PRICES: &[(&str, u32)] = &[
    ("pizza", 299),
    ("burger", 199),
    ("biryani", 349),
    ("chicken", 249),
    ("chinese", 279),
    ("indian", 229),
    ("pasta", 189),
];
const DEFAULT_ITEM_PRICE: u32 = 250;
const DELIVERY_CHARGE: u32 = 40;

impl SimulatedFoodDelivery {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedFoodDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FoodDeliveryService for SimulatedFoodDelivery {
    async fn place_order(
        &self,
        platform: &str,
        item: &str,
        quantity: u32,
    ) -> Result<OrderConfirmation> {
        let price_per_item = MENU_PRICES
            .iter()
            .find(|(name, _)| *name == item)
            .map(|(_, price)| *price)
            .unwrap_or(DEFAULT_ITEM_PRICE);
        let subtotal = price_per_item * quantity;
        let taxes = subtotal / 20; // 5% tax
        let eta_minutes = rand::thread_rng().gen_range(25..=45);

        Ok(OrderConfirmation {
            order_id: synthetic_confirmation_id(platform),
            platform: platform.to_string(),
            item: item.to_string(),
            quantity,
            subtotal,
            delivery_charge: DELIVERY_CHARGE,
            taxes,
            total: subtotal + DELIVERY_CHARGE + taxes,
            eta: format!("{}-{} minutes", eta_minutes, eta_minutes + 10),
        })
    }
}

/// `SWIGGY_1A2B3C4D`-style synthetic id.
pub(crate) fn synthetic_confirmation_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix.to_uppercase(), hex[..8].to_uppercase())
}

pub struct FoodOrderingPlugin {
    service: Arc<dyn FoodDeliveryService>,
}

const SUPPORTED_PLATFORMS: &[&str] = &["swiggy", "zomato", "ubereats"];

impl FoodOrderingPlugin {
    pub fn new(service: Arc<dyn FoodDeliveryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Plugin for FoodOrderingPlugin {
    fn name(&self) -> &str {
        "food_ordering"
    }

    fn description(&self) -> &str {
        "Orders food from delivery platforms"
    }

    fn supported_intents(&self) -> &[Intent] {
        &[Intent::OrderFood]
    }

    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;

        let platform = request.param_or("platform", "swiggy").to_lowercase();
        let item = request.param_or("item", "pizza").to_string();
        let quantity = request.param_u32_or("quantity", 1);

        if !SUPPORTED_PLATFORMS.contains(&platform.as_str()) {
            return Ok(Envelope::fail(format!(
                "Platform {} is not supported. Try one of: {}",
                platform,
                SUPPORTED_PLATFORMS.join(", ")
            ))
            .with("supported_platforms", SUPPORTED_PLATFORMS.to_vec()));
        }

        let order = self.service.place_order(&platform, &item, quantity).await?;
        info!("Placed order {} on {}", order.order_id, order.platform);

        Ok(Envelope::ok(format!(
            "Order placed on {}: {} x {} for \u{20b9}{} (ETA {})",
            order.platform, order.quantity, order.item, order.total, order.eta
        ))
        .with("order_id", order.order_id)
        .with("platform", order.platform)
        .with("item", order.item)
        .with("quantity", order.quantity)
        .with("subtotal", order.subtotal)
        .with("delivery_charge", order.delivery_charge)
        .with("taxes", order.taxes)
        .with("total", order.total)
        .with("eta", order.eta))
    }
}
