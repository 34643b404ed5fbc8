//! Movie ticket booking.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tracing::info;

use crate::envelope::Envelope;
use crate::intent::Intent;
use crate::plugin::{ensure_supported, CommandRequest, Plugin};
use crate::plugins::food_ordering::synthetic_confirmation_id;

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub movie: String,
    pub theater: String,
    pub showtime: String,
    pub seats: Vec<String>,
    pub price_per_ticket: u32,
    pub total: u32,
}

/// Seam to a ticketing platform.
#[async_trait]
pub trait TicketingService: Send + Sync {
    /// Lists titles currently showing.
    async fn now_showing(&self) -> Result<Vec<String>>;

    async fn book(
        &self,
        movie: &str,
        showtime: &str,
        seats: u32,
    ) -> Result<BookingConfirmation>;
}

/// Simulated ticketing platform with a fixed now-showing board. Booking
/// ids and seat assignments are synthetic.
pub struct SimulatedTicketing {
    now_showing: Vec<(&'static str, &'static str)>, // (title, theater)
}

const TICKET_PRICE: u32 = 250;

impl SimulatedTicketing {
    pub fn new() -> Self {
        Self {
            now_showing: vec![
                ("Avengers: Endgame", "PVR Cinemas"),
                ("Inception", "INOX"),
                ("The Batman", "Cinepolis"),
            ],
        }
    }
}

impl Default for SimulatedTicketing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketingService for SimulatedTicketing {
    async fn now_showing(&self) -> Result<Vec<String>> {
        Ok(self
            .now_showing
            .iter()
            .map(|(title, _)| title.to_string())
            .collect())
    }

    async fn book(&self, movie: &str, showtime: &str, seats: u32) -> Result<BookingConfirmation> {
        let wanted = movie.to_lowercase();
        let (title, theater) = self
            .now_showing
            .iter()
            .find(|(title, _)| title.to_lowercase().contains(&wanted))
            .ok_or_else(|| anyhow::anyhow!("'{}' is not showing", movie))?;

        let mut rng = rand::thread_rng();
        let row = (b'A' + rng.gen_range(0..8)) as char;
        let first_seat = rng.gen_range(1..=12);
        let seats: Vec<String> = (0..seats).map(|i| format!("{}{}", row, first_seat + i)).collect();
        let total = TICKET_PRICE * seats.len() as u32;

        Ok(BookingConfirmation {
            booking_id: synthetic_confirmation_id("bms"),
            movie: title.to_string(),
            theater: theater.to_string(),
            showtime: showtime.to_string(),
            seats,
            price_per_ticket: TICKET_PRICE,
            total,
        })
    }
}

pub struct MovieBookingPlugin {
    service: Arc<dyn TicketingService>,
}

impl MovieBookingPlugin {
    pub fn new(service: Arc<dyn TicketingService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Plugin for MovieBookingPlugin {
    fn name(&self) -> &str {
        "movie_booking"
    }

    fn description(&self) -> &str {
        "Books movie tickets on ticketing platforms"
    }

    fn supported_intents(&self) -> &[Intent] {
        &[Intent::BookMovie]
    }

    async fn execute(&self, request: &CommandRequest) -> Result<Envelope> {
        ensure_supported(self, request.intent)?;

        let movie = request.param_or("movie", "").to_string();
        let showtime = request.param_or("time", "evening").to_string();
        let seats = request.param_u32_or("seats", 1);

        if movie.is_empty() {
            let titles = self.service.now_showing().await?;
            return Ok(Envelope::fail(format!(
                "Which movie? Now showing: {}",
                titles.join(", ")
            ))
            .with("now_showing", titles));
        }

        match self.service.book(&movie, &showtime, seats).await {
            Ok(booking) => {
                info!("Booked {} for {}", booking.booking_id, booking.movie);
                Ok(Envelope::ok(format!(
                    "Booked {} seat(s) for {} at {} ({}), \u{20b9}{} total",
                    booking.seats.len(),
                    booking.movie,
                    booking.theater,
                    booking.showtime,
                    booking.total
                ))
                .with("booking_id", booking.booking_id)
                .with("movie", booking.movie)
                .with("theater", booking.theater)
                .with("showtime", booking.showtime)
                .with("seats", booking.seats)
                .with("total", booking.total))
            }
            // A title that isn't showing is a domain miss, not a fault.
            Err(error) => {
                let titles = self.service.now_showing().await.unwrap_or_default();
                Ok(Envelope::fail(format!(
                    "{}. Now showing: {}",
                    error,
                    titles.join(", ")
                ))
                .with("now_showing", titles))
            }
        }
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
        CommandRequest::new(Intent::BookMovie, parameters, "book a movie")
    }

    #[tokio::test]
    async fn books_a_showing_title() {
        let plugin = MovieBookingPlugin::new(Arc::new(SimulatedTicketing::new()));
        let envelope = plugin
            .execute(&request(&[("movie", "inception"), ("time", "tonight")]))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.get_str("movie"), Some("Inception"));
        assert_eq!(envelope.get_str("showtime"), Some("tonight"));
        assert!(envelope.get_str("booking_id").unwrap().starts_with("BMS_"));
    }

    #[tokio::test]
    async fn unknown_title_lists_the_board() {
        let plugin = MovieBookingPlugin::new(Arc::new(SimulatedTicketing::new()));
        let envelope = plugin
            .execute(&request(&[("movie", "nonexistent film")]))
            .await
            .unwrap();

        assert!(!envelope.success);
        assert!(envelope.message.contains("Now showing"));
    }

    #[tokio::test]
    async fn missing_title_asks_which_movie() {
        let plugin = MovieBookingPlugin::new(Arc::new(SimulatedTicketing::new()));
        let envelope = plugin.execute(&request(&[])).await.unwrap();
        assert!(!envelope.success);
        assert!(envelope.get("now_showing").is_some());
    }

    #[tokio::test]
    async fn seat_count_follows_the_request() {
        let service = SimulatedTicketing::new();
        let booking = service.book("batman", "9 pm", 3).await.unwrap();
        assert_eq!(booking.seats.len(), 3);
        assert_eq!(booking.total, 750);
    }
}
