//! Shopping across e-commerce platforms.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{ensure_supported, CommandRequest, Plugin};
use crate::plugins::food_ordering::synthetic_confirmation_id;

#[derive(Debug, Clone)]
pub struct PurchaseConfirmation {
    pub order_id: String,
    pub platform: String,
    pub product: String,
    pub brand: String,
    pub price: u32,
    pub delivery_estimate: String,
}

/// Seam to an e-commerce storefront.
#[async_trait]
pub trait ShoppingService: Send + Sync {
    /// Finds a product in the catalog, optionally constrained by color.
    async fn find_product(&self, item: &str, color: Option<&str>) -> Result<Option<CatalogEntry>>;

    async fn purchase(&self, platform: &str, entry: &CatalogEntry)
        -> Result<PurchaseConfirmation>;
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub brand: String,
    pub price: u32,
    pub colors: Vec<String>,
}

/// Simulated storefront backed by a fixed catalog.
pub struct SimulatedStorefront {
    catalog: Vec<(&'static str, CatalogEntry)>,
}

impl SimulatedStorefront {
    pub fn new() -> Self {
        let entry = |name: &str, brand: &str, price: u32, colors: &[&str]| CatalogEntry {
            name: name.to_string(),
            brand: brand.to_string(),
            price,
            colors: colors.iter().map(|c| c.to_string()).collect(),
        };
        Self {
            catalog: vec![
                ("dress", entry("Formal Dress", "ElegantWear", 2499, &["black", "navy", "red"])),
                ("shirt", entry("Cotton Shirt", "CottonKing", 899, &["white", "blue", "black"])),
                ("shoes", entry("Running Shoes", "SportsMaster", 2999, &["black", "white", "blue"])),
                ("book", entry("Programming Guide", "TechPublisher", 599, &[])),
                ("phone", entry("Smartphone Pro", "TechBrand", 25999, &["black", "white"])),
                ("laptop", entry("Ultrabook 14", "TechBrand", 58999, &["silver"])),
            ],
        }
    }
}

impl Default for SimulatedStorefront {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShoppingService for SimulatedStorefront {
    async fn find_product(&self, item: &str, color: Option<&str>) -> Result<Option<CatalogEntry>> {
        let found = self
            .catalog
            .iter()
            .find(|(key, _)| *key == item)
            .map(|(_, entry)| entry.clone());
        Ok(found.filter(|entry| {
            // Colorless items ignore the color constraint.
            match color {
                Some(color) if !entry.colors.is_empty() => {
                    entry.colors.iter().any(|c| c == color)
                }
                _ => true,
            }
        }))
    }

    async fn purchase(
        &self,
        platform: &str,
        entry: &CatalogEntry,
    ) -> Result<PurchaseConfirmation> {
        Ok(PurchaseConfirmation {
            order_id: synthetic_confirmation_id(platform),
            platform: platform.to_string(),
            product: entry.name.clone(),
            brand: entry.brand.clone(),
            price: entry.price,
            delivery_estimate: "2-4 days".to_string(),
        })
    }
}

pub struct ShoppingPlugin {
    service: Arc<dyn ShoppingService>,
}

const SUPPORTED_PLATFORMS: &[&str] = &["amazon", "flipkart", "myntra", "ebay"];

impl ShoppingPlugin {
    pub fn new(service: Arc<dyn ShoppingService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Plugin for ShoppingPlugin {
    fn name(&self) -> &str {
        "shopping"
    }

    fn description(&self) -> &str {
        "Orders items from e-commerce platforms"
    }

    fn supported_intents(&self) -> &[Intent] {
        &[Intent::Shopping]
    }

    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;

        let platform = request.param_or("platform", "amazon").to_lowercase();
        let item = request.param_or("item", "").to_lowercase();
        let color = request.param("color");

        if !SUPPORTED_PLATFORMS.contains(&platform.as_str()) {
            return Ok(Envelope::fail(format!(
                "Platform {} is not supported. Try one of: {}",
                platform,
                SUPPORTED_PLATFORMS.join(", ")
            ))
            .with("supported_platforms", SUPPORTED_PLATFORMS.to_vec()));
        }
        if item.is_empty() {
            return Ok(Envelope::fail(
                "What would you like to buy? Try something like \"buy a red dress from amazon\".",
            ));
        }

        let Some(entry) = self.service.find_product(&item, color).await? else {
            return Ok(Envelope::fail(format!(
                "No {} matching your criteria{}",
                item,
                color.map(|c| format!(" (color: {})", c)).unwrap_or_default()
            )));
        };

        let purchase = self.service.purchase(&platform, &entry).await?;
        info!("Purchased {} on {}", purchase.order_id, purchase.platform);

        let mut message = format!(
            "Ordered {} ({}) on {} for \u{20b9}{}, arriving in {}",
            purchase.product,
            purchase.brand,
            purchase.platform,
            purchase.price,
            purchase.delivery_estimate
        );
        if let Some(color) = color {
            message.push_str(&format!(" [{}]", color));
        }

        Ok(Envelope::ok(message)
            .with("order_id", purchase.order_id)
            .with("platform", purchase.platform)
            .with("product", purchase.product)
            .with("price", purchase.price)
            .with("delivery_estimate", purchase.delivery_estimate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request(params: &[(&str, &str)]) -> CommandRequest {
        let parameters: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CommandRequest::new(Intent::Shopping, parameters, "buy a dress")
    }

    #[tokio::test]
    async fn buys_a_catalog_item_in_a_stocked_color() {
        let plugin = ShoppingPlugin::new(Arc::new(SimulatedStorefront::new()));
        let envelope = plugin
            .execute(&request(&[
                ("item", "dress"),
                ("color", "red"),
                ("platform", "amazon"),
            ]))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.get_str("platform"), Some("amazon"));
        assert_eq!(envelope.get_str("product"), Some("Formal Dress"));
    }

    #[tokio::test]
    async fn unstocked_color_is_a_domain_miss() {
        let plugin = ShoppingPlugin::new(Arc::new(SimulatedStorefront::new()));
        let envelope = plugin
            .execute(&request(&[("item", "dress"), ("color", "green")]))
            .await
            .unwrap();

        assert!(!envelope.success);
        assert!(envelope.message.contains("dress"));
    }

    #[tokio::test]
    async fn unknown_platform_fails_with_supported_list() {
        let plugin = ShoppingPlugin::new(Arc::new(SimulatedStorefront::new()));
        let envelope = plugin
            .execute(&request(&[("item", "dress"), ("platform", "etsy")]))
            .await
            .unwrap();

        assert!(!envelope.success);
        assert!(envelope.get("supported_platforms").is_some());
    }

    #[tokio::test]
    async fn colorless_items_ignore_color_constraint() {
        let storefront = SimulatedStorefront::new();
        let entry = storefront.find_product("book", Some("red")).await.unwrap();
        assert!(entry.is_some());
    }
}
