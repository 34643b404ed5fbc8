//! Watchlist snapshot.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tracing::warn;

use crate::envelope::Envelope;
use crate::tasks::DailyTask;

#[derive(Debug, Clone)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change_percent: f64,
}

/// Seam to a market-data provider.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<Quote>;
}

/// Simulated provider: a fixed base price per symbol with a random daily
/// move.
pub struct SimulatedMarketData;

const BASE_PRICES: &[(&str, f64)] = &[
    ("AAPL", 175.0),
    ("GOOGL", 2800.0),
    ("MSFT", 310.0),
    ("AMZN", 3400.0),
    ("TSLA", 250.0),
];

impl SimulatedMarketData {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedMarketData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataService for SimulatedMarketData {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        let base = BASE_PRICES
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, p)| *p)
            .ok_or_else(|| anyhow::anyhow!("unknown symbol '{}'", symbol))?;
        let change_percent = rand::thread_rng().gen_range(-3.0..3.0);
        Ok(Quote {
            symbol: symbol.to_string(),
            price: base * (1.0 + change_percent / 100.0),
            change_percent,
        })
    }
}

const WATCHLIST: &[&str] = &["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"];

pub struct StocksTask {
    market: Arc<dyn MarketDataService>,
}

impl StocksTask {
    pub fn new(market: Arc<dyn MarketDataService>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl DailyTask for StocksTask {
    fn name(&self) -> &'static str {
        "stocks"
    }

    fn label(&self) -> &'static str {
        "Stock Watchlist"
    }

    async fn run(&self) -> Envelope {
        let mut quotes = Vec::new();
        for symbol in WATCHLIST {
            match self.market.quote(symbol).await {
                Ok(quote) => quotes.push(quote),
                // One dead symbol shouldn't sink the snapshot.
                Err(error) => warn!("Quote for {} failed: {:#}", symbol, error),
            }
        }

        if quotes.is_empty() {
            return Envelope::fail("Market data unavailable for the whole watchlist.");
        }

        let best = quotes
            .iter()
            .max_by(|a, b| a.change_percent.total_cmp(&b.change_percent))
            .cloned();
        let summary: Vec<String> = quotes
            .iter()
            .map(|q| format!("{} {:+.1}%", q.symbol, q.change_percent))
            .collect();

        let mut envelope =
            Envelope::ok(format!("Watchlist: {}", summary.join(", "))).with("quotes", summary);
        if let Some(best) = best {
            envelope = envelope.with("top_mover", best.symbol);
        }
        envelope
    }
}
