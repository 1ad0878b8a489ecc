// ============================================================================
// BOOKING SERVICE - Catálogo público y reservas de clientes
// ============================================================================

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::models::{Booking, BookingEnvelope, Device, Session};
use crate::services::api_client::{ApiClient, ApiError, RequestOptions};
use crate::services::http::Method;
use crate::utils::constants::DEFAULT_TIME_SLOT;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBooking {
    pub user_id: Option<u64>,
    pub device_id: u64,
    pub date: String,
    pub time_slot: String,
}

impl NewBooking {
    /// Sin franja elegida se reserva por la mañana
    pub fn new(session: &Session, device_id: u64, date: &str, time_slot: &str) -> Self {
        let slot = time_slot.trim();
        Self {
            user_id: session.user.user_id,
            device_id,
            date: date.trim().to_string(),
            time_slot: if slot.is_empty() { DEFAULT_TIME_SLOT } else { slot }.to_string(),
        }
    }
}

/// Primer día reservable: mañana
pub fn min_booking_date(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

/// `min` del input de fecha según el reloj local
pub fn min_booking_date_today() -> String {
    min_booking_date(Local::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

#[derive(Clone)]
pub struct BookingService {
    api: ApiClient,
}

impl BookingService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create(&self, booking: &NewBooking) -> Result<serde_json::Value, ApiError> {
        log::info!("📅 [BOOKING] Reservando dispositivo {} para {}", booking.device_id, booking.date);
        self.api
            .send_json(Method::Post, "bookings", booking, &RequestOptions::fallback("Booking failed"))
            .await
    }

    pub async fn device(&self, id: u64) -> Result<Device, ApiError> {
        self.api
            .get_json(&format!("devices/{}", id), &RequestOptions::fallback("Failed to load device"))
            .await
    }

    /// Detalle de reserva (admin/staff pueden ver cualquiera)
    pub async fn booking(&self, id: u64) -> Result<Booking, ApiError> {
        let envelope: BookingEnvelope = self
            .api
            .get_json(&format!("my-bookings/{}", id), &RequestOptions::fallback("Failed to load booking details"))
            .await?;
        Ok(envelope.into_booking())
    }
}
